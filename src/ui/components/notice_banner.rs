use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sitescout_core::notice::Notice;

/// One-line banner for the newest pending notice
pub struct NoticeBanner;

impl NoticeBanner {
    pub fn render(frame: &mut Frame, area: Rect, notice: &Notice, pending: usize) {
        let mut spans = vec![
            Span::styled(
                " ! ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", notice.message),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            Span::styled(
                format!(" {} ", notice.raised_at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if pending > 1 {
            spans.push(Span::styled(
                format!("(+{} more) ", pending - 1),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::styled(
            "d",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(":Dismiss", Style::default().fg(Color::DarkGray)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::render_to_string;
    use chrono::Utc;
    use sitescout_core::notice::NoticeKind;

    #[test]
    fn test_banner_text() {
        let notice = Notice {
            id: 1,
            kind: NoticeKind::SaveSession,
            message: NoticeKind::SaveSession.message(),
            raised_at: Utc::now(),
        };
        let text = render_to_string(80, 1, |frame| {
            NoticeBanner::render(frame, frame.area(), &notice, 3)
        });
        assert!(text.contains("Could not save session."));
        assert!(text.contains("(+2 more)"));
    }
}
