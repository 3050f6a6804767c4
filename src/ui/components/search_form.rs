use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use sitescout_core::editor::{Draft, EditorPhase};
use sitescout_core::models::{IssueKind, SearchConfiguration};
use unicode_width::UnicodeWidthStr;

use crate::ui::view::{Focus, FormField, Snapshot, UiState};

/// Width of the field label column
const LABEL_WIDTH: usize = 13;

/// Edit form for the selected session's search configuration
pub struct SearchForm;

impl SearchForm {
    /// Render the form
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState) {
        let focused = ui.focus == Focus::Form;
        let editor = &snapshot.editor;

        let label = snapshot
            .selected
            .and_then(|id| snapshot.sessions.iter().find(|s| s.id == id))
            .map(|s| s.display_label().to_string());
        let mut title = match label {
            Some(label) => format!(" Search: {} ", label),
            None => " Search ".to_string(),
        };
        if editor.dirty {
            title.push_str("[modified] ");
        }

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::Gray }));

        let lines = match (editor.phase, editor.draft.as_ref()) {
            (EditorPhase::Idle, _) => vec![Self::hint("Select a session to edit its search.")],
            (EditorPhase::Loading, _) => vec![Self::hint(&format!(
                "{} Loading session...",
                ui.spinner_char()
            ))],
            (EditorPhase::LoadFailed, _) => vec![Line::from(Span::styled(
                "Session could not be loaded. Press x, then select it again to retry.",
                Style::default().fg(Color::Red),
            ))],
            (phase, Some(draft)) => Self::form_lines(snapshot, draft, phase, ui, focused),
            (_, None) => vec![],
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);

        if focused && ui.form_field == FormField::Query && editor.phase.is_editable() {
            let query = snapshot.query();
            let before: String = query.chars().take(ui.query_cursor).collect();
            let x = area.x + 1 + (LABEL_WIDTH + before.width()) as u16;
            let y = area.y + 3;
            if x < area.x + area.width.saturating_sub(1) && y < area.y + area.height {
                frame.set_cursor_position((x, y));
            }
        }
    }

    fn form_lines(
        snapshot: &Snapshot,
        draft: &Draft,
        phase: EditorPhase,
        ui: &UiState,
        focused: bool,
    ) -> Vec<Line<'static>> {
        let errors = &snapshot.editor.errors;
        let mut lines = vec![
            Self::progress_line(snapshot.editor.saved.as_ref(), phase),
            Line::from(""),
        ];

        let at = |field: FormField| focused && ui.form_field == field;

        lines.push(Self::field_line("Query", &draft.query, at(FormField::Query)));
        lines.push(Self::error_line(errors.query));
        lines.push(Self::field_line(
            "Max results",
            &draft.max_results.to_string(),
            at(FormField::MaxResults),
        ));
        lines.push(Self::error_line(errors.max_results));

        for (index, kind) in IssueKind::all_variants().iter().enumerate() {
            let label = if index == 0 { "Issues" } else { "" };
            lines.push(Self::issue_line(
                label,
                *kind,
                draft.issues.contains(kind),
                at(FormField::Issue(index)),
            ));
        }
        lines.push(Self::error_line(errors.issues));
        lines
    }

    /// Server-side progress of the saved search
    fn progress_line(saved: Option<&SearchConfiguration>, phase: EditorPhase) -> Line<'static> {
        let mut spans = Vec::new();
        match saved {
            None => spans.push(Span::styled(
                "Not configured yet",
                Style::default().fg(Color::DarkGray),
            )),
            Some(config) => {
                spans.push(Span::styled(
                    format!(
                        "{}/{} websites checked",
                        config.checked_websites_count, config.max_results_requested
                    ),
                    Style::default().fg(Color::White),
                ));
                let (state, color) = if config.is_completed {
                    ("completed", Color::Green)
                } else {
                    ("in progress", Color::Yellow)
                };
                spans.push(Span::styled(format!("  {}", state), Style::default().fg(color)));
                if config.last_search_cursor.is_some() && !config.is_completed {
                    spans.push(Span::styled(
                        "  (resumable)",
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
        }
        if phase == EditorPhase::Submitting {
            spans.push(Span::styled(
                "  Saving...",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
        let value_style = if active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Self::label(label, active),
            Span::styled(format!("{} ", value), value_style),
        ])
    }

    fn issue_line(label: &str, kind: IssueKind, checked: bool, active: bool) -> Line<'static> {
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = if active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Self::label(label, active),
            Span::styled(format!("{} {}", mark, kind.label()), style),
        ])
    }

    fn error_line(error: Option<&'static str>) -> Line<'static> {
        match error {
            Some(message) => Line::from(vec![
                Span::raw(" ".repeat(LABEL_WIDTH)),
                Span::styled(message, Style::default().fg(Color::Red)),
            ]),
            None => Line::from(""),
        }
    }

    fn label(text: &str, active: bool) -> Span<'static> {
        let style = if active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Span::styled(format!("{:width$}", text, width = LABEL_WIDTH), style)
    }

    fn hint(text: &str) -> Line<'static> {
        Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    }
}
