use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Help popup widget
pub struct HelpPopup;

impl HelpPopup {
    /// Render the help popup
    pub fn render(frame: &mut Frame, area: Rect) {
        // Clear the area first
        frame.render_widget(Clear, area);

        let help_text = vec![
            Line::from(vec![Span::styled(
                "sitescout - search session manager",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Self::section("Sessions"),
            Self::help_line("j / ↓", "Next session"),
            Self::help_line("k / ↑", "Previous session"),
            Self::help_line("Enter", "Open session"),
            Self::help_line("n", "Create session"),
            Self::help_line("r", "Refresh list"),
            Self::help_line("x", "Close session"),
            Line::from(""),
            Self::section("Search form"),
            Self::help_line("↑ / ↓", "Move between fields"),
            Self::help_line("Space", "Toggle issue"),
            Self::help_line("Enter", "Save (from query or max results)"),
            Self::help_line("Ctrl+s", "Save"),
            Line::from(""),
            Self::section("Results"),
            Self::help_line("j / k", "Scroll"),
            Self::help_line("r", "Reload results"),
            Self::help_line("m", "Load more results"),
            Line::from(""),
            Self::section("General"),
            Self::help_line("Tab", "Next panel"),
            Self::help_line("d", "Dismiss notice"),
            Self::help_line("D", "Dismiss all notices"),
            Self::help_line("?", "Toggle this help"),
            Self::help_line("q / Ctrl+c", "Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press any key to close",
                Style::default().fg(Color::DarkGray),
            )]),
        ];

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(help_text).block(block);

        frame.render_widget(paragraph, area);
    }

    fn section(title: &str) -> Line<'static> {
        Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )])
    }

    fn help_line(key: &str, description: &str) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("  {:12}", key),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_line() {
        let line = HelpPopup::help_line("test", "description");
        assert_eq!(line.spans.len(), 2);
    }
}
