use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use sitescout_core::models::Session;

use crate::ui::view::{Focus, Snapshot, UiState};

/// Widget for picking a session
pub struct SessionList;

impl SessionList {
    /// Render the session list
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState) {
        let busy = if snapshot.sessions_loading || snapshot.creating {
            format!("{} ", ui.spinner_char())
        } else {
            String::new()
        };
        let count = if snapshot.sessions_truncated {
            format!("newest {}", snapshot.sessions.len())
        } else {
            snapshot.sessions.len().to_string()
        };
        let title = format!(" Sessions ({}) {}", count, busy);

        let border_color = if ui.focus == Focus::Sessions {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        if snapshot.sessions.is_empty() {
            let hint = if snapshot.sessions_loading {
                "Loading sessions..."
            } else {
                "No sessions. Press 'n' to create one."
            };
            let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = snapshot
            .sessions
            .iter()
            .map(|session| Self::create_list_item(session, snapshot.selected == Some(session.id)))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(ui.list_cursor.min(snapshot.sessions.len() - 1)));

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn create_list_item(session: &Session, is_selected: bool) -> ListItem<'static> {
        let marker = if is_selected { "● " } else { "  " };
        let (flag, flag_color) = Self::flag(session);

        let spans = vec![
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::styled(
                truncate(session.display_label(), 28),
                Style::default().fg(Color::White),
            ),
            Span::styled(format!(" {}", flag), Style::default().fg(flag_color)),
            Span::styled(
                format!(" {}", session.created_at.format("%Y-%m-%d")),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        ListItem::new(Line::from(spans))
    }

    fn flag(session: &Session) -> (&'static str, Color) {
        match (session.is_configured, session.is_completed) {
            (_, true) => ("[done]", Color::Green),
            (true, false) => ("[running]", Color::Yellow),
            (false, false) => ("[new]", Color::Gray),
        }
    }
}

/// Truncate a string to a maximum length
fn truncate(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let truncated: String = chars[..max_len.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::{empty_snapshot, render_to_string, session};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ブーランジェリー・リヨン", 8), "ブーランジ...");
    }

    #[test]
    fn test_renders_labels_and_flags() {
        let mut snapshot = empty_snapshot();
        let mut configured = session(2, "Bakeries in Lyon");
        configured.is_configured = true;
        snapshot.sessions = vec![configured, session(1, "  ")];
        snapshot.selected = Some(2);

        let text = render_to_string(60, 6, |frame| {
            SessionList::render(frame, frame.area(), &snapshot, &UiState::new())
        });
        assert!(text.contains("Sessions (2)"));
        assert!(text.contains("Bakeries in Lyon [running]"));
        assert!(text.contains("Untitled [new]"));
    }

    #[test]
    fn test_truncated_list_says_so() {
        let mut snapshot = empty_snapshot();
        snapshot.sessions = vec![session(2, "a"), session(1, "b")];
        snapshot.sessions_truncated = true;

        let text = render_to_string(60, 5, |frame| {
            SessionList::render(frame, frame.area(), &snapshot, &UiState::new())
        });
        assert!(text.contains("Sessions (newest 2)"));
    }

    #[test]
    fn test_saved_query_is_the_label() {
        let mut snapshot = empty_snapshot();
        let mut opened = session(3, "");
        opened.query = Some("florists in hull".to_string());
        snapshot.sessions = vec![opened];

        let text = render_to_string(60, 4, |frame| {
            SessionList::render(frame, frame.area(), &snapshot, &UiState::new())
        });
        assert!(text.contains("florists in hull"));
        assert!(!text.contains("Untitled"));
    }

    #[test]
    fn test_empty_list_hint() {
        let text = render_to_string(50, 4, |frame| {
            SessionList::render(frame, frame.area(), &empty_snapshot(), &UiState::new())
        });
        assert!(text.contains("Press 'n' to create one."));
    }
}
