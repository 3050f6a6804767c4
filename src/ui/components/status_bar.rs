use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sitescout_core::editor::EditorPhase;

use crate::ui::view::{Focus, Snapshot, UiState};

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState, show_hints: bool) {
        let mut spans = vec![Span::styled(
            format!(" {} ", ui.focus.display_name()),
            Style::default().fg(Color::White).bg(Color::DarkGray),
        )];
        spans.push(Span::raw(" "));

        // Editor phase of the selected session
        if snapshot.selected.is_some() {
            let phase = snapshot.editor.phase;
            spans.push(Span::styled(
                format!("[{}] ", phase.display_name()),
                Style::default().fg(Self::phase_color(phase)),
            ));
        }

        if show_hints {
            for (key, label, color) in Self::hints(ui) {
                spans.push(Span::styled(
                    *key,
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    format!(":{} ", label),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        // Last successful list refresh
        if let Some(last_sync) = snapshot.last_sync {
            let elapsed = chrono::Utc::now()
                .signed_duration_since(last_sync)
                .num_seconds();
            spans.push(Span::styled(
                format!(" [synced {}s ago] ", elapsed),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
        frame.render_widget(paragraph, area);
    }

    fn hints(ui: &UiState) -> &'static [(&'static str, &'static str, Color)] {
        if ui.is_typing() {
            return &[
                ("Enter", "Save", Color::Green),
                ("Tab", "Next panel", Color::Cyan),
                ("↑/↓", "Field", Color::Cyan),
                ("Esc", "Back", Color::Yellow),
            ];
        }
        match ui.focus {
            Focus::Sessions => &[
                ("j/k", "Nav", Color::Cyan),
                ("Enter", "Open", Color::Green),
                ("n", "New", Color::Green),
                ("r", "Refresh", Color::Blue),
                ("?", "Help", Color::Cyan),
                ("q", "Quit", Color::Red),
            ],
            Focus::Form => &[
                ("j/k", "Field", Color::Cyan),
                ("Space", "Toggle", Color::Yellow),
                ("Ctrl+s", "Save", Color::Green),
                ("Esc", "Back", Color::Yellow),
            ],
            Focus::Results => &[
                ("j/k", "Scroll", Color::Cyan),
                ("r", "Refresh", Color::Blue),
                ("Esc", "Back", Color::Yellow),
            ],
        }
    }

    fn phase_color(phase: EditorPhase) -> Color {
        match phase {
            EditorPhase::Idle => Color::Gray,
            EditorPhase::Loading | EditorPhase::Submitting => Color::Yellow,
            EditorPhase::Ready | EditorPhase::ReadyEmpty => Color::Green,
            EditorPhase::LoadFailed => Color::Red,
        }
    }
}
