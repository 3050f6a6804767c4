use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use sitescout_core::editor::EditorPhase;
use sitescout_core::models::ResultRow;
use sitescout_core::results::{ResultsView, NO_RESULTS_PLACEHOLDER};

use crate::ui::view::{Focus, Snapshot, UiState};

/// Status labels are shown verbatim; `completed` is the longest one
const STATUS_WIDTH: u16 = 11;

/// Table of websites found for the selected session
pub struct ResultsTable;

impl ResultsTable {
    /// Render the results panel
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, ui: &UiState) {
        let title = match &snapshot.results.view {
            ResultsView::Loaded { rows } if snapshot.results.loading_more => {
                format!(" Results ({}) {} loading more ", rows.len(), ui.spinner_char())
            }
            ResultsView::Loaded { rows } if snapshot.results.has_more => {
                format!(" Results (first {}, m: more) ", rows.len())
            }
            ResultsView::Loaded { rows } => format!(" Results ({}) ", rows.len()),
            _ => " Results ".to_string(),
        };
        let border_color = if ui.focus == Focus::Results {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let message = match &snapshot.results.view {
            ResultsView::NotRequested if snapshot.editor.phase == EditorPhase::ReadyEmpty => Some((
                "Save the search to start collecting results.",
                Color::DarkGray,
            )),
            ResultsView::NotRequested => Some(("", Color::DarkGray)),
            ResultsView::Loading => None,
            ResultsView::Error => Some((
                "Results could not be loaded. Press r to retry.",
                Color::Red,
            )),
            ResultsView::Loaded { rows } if rows.is_empty() => {
                Some((NO_RESULTS_PLACEHOLDER, Color::DarkGray))
            }
            ResultsView::Loaded { .. } => None,
        };

        if let Some((text, color)) = message {
            let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(color))).block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let ResultsView::Loaded { rows } = &snapshot.results.view else {
            let loading = format!("{} Loading results...", ui.spinner_char());
            let paragraph =
                Paragraph::new(Span::styled(loading, Style::default().fg(Color::DarkGray))).block(block);
            frame.render_widget(paragraph, area);
            return;
        };

        let offset = ui.results_offset.min(rows.len().saturating_sub(1));
        let header = Row::new(["URL", "Domain", "Pages", "Tier", "Issues", "Status"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let body: Vec<Row> = rows.iter().skip(offset).map(Self::row).collect();

        let table = Table::new(
            body,
            [
                Constraint::Fill(3),
                Constraint::Fill(2),
                Constraint::Length(5),
                Constraint::Length(4),
                Constraint::Fill(3),
                Constraint::Length(STATUS_WIDTH),
            ],
        )
        .header(header)
        .column_spacing(1)
        .block(block);

        frame.render_widget(table, area);
    }

    fn row(result: &ResultRow) -> Row<'static> {
        Row::new(vec![
            Cell::from(result.url.clone()),
            Cell::from(result.domain.clone()),
            Cell::from(result.page_count.to_string()),
            Cell::from(result.tier.to_string()).style(Self::tier_style(result.tier)),
            Cell::from(result.issues_text()),
            Cell::from(result.status.clone()),
        ])
    }

    fn tier_style(tier: i64) -> Style {
        match tier {
            i64::MIN..=1 => Style::default().fg(Color::Green),
            2 => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::Red),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::test_support::{empty_snapshot, render_to_string};
    use chrono::Utc;
    use sitescout_core::models::IssueKind;
    use std::collections::BTreeSet;

    fn with_view(view: ResultsView) -> Snapshot {
        let mut snapshot = empty_snapshot();
        snapshot.selected = Some(3);
        snapshot.editor.phase = EditorPhase::Ready;
        snapshot.results.session_id = Some(3);
        snapshot.results.view = view;
        snapshot
    }

    fn draw(snapshot: &Snapshot) -> String {
        render_to_string(100, 8, |frame| {
            ResultsTable::render(frame, frame.area(), snapshot, &UiState::new())
        })
    }

    #[test]
    fn test_empty_results_show_placeholder() {
        let text = draw(&with_view(ResultsView::Loaded { rows: vec![] }));
        assert!(text.contains(NO_RESULTS_PLACEHOLDER));
    }

    fn result_row() -> ResultRow {
        ResultRow {
            id: 1,
            created_at: Utc::now(),
            session_id: 3,
            url: "https://roof.example.com/".into(),
            domain: "roof.example.com".into(),
            page_count: 12,
            tier: 2,
            issues_detected: BTreeSet::from([IssueKind::MissingTitle, IssueKind::MissingH1]),
            lighthouse_json: None,
            contact_email: None,
            status: "completed".into(),
        }
    }

    #[test]
    fn test_rows_rendered() {
        let row = result_row();
        let text = draw(&with_view(ResultsView::Loaded { rows: vec![row] }));
        assert!(text.contains("Results (1)"));
        assert!(text.contains("roof.example.com"));
        assert!(text.contains("completed"));
        assert!(!text.contains(NO_RESULTS_PLACEHOLDER));
    }

    #[test]
    fn test_status_not_cut_on_narrow_terminal() {
        let rows = vec![result_row(), result_row()];
        let snapshot = with_view(ResultsView::Loaded { rows });
        let text = render_to_string(80, 8, |frame| {
            ResultsTable::render(frame, frame.area(), &snapshot, &UiState::new())
        });
        assert_eq!(text.matches("completed").count(), 2);
    }

    #[test]
    fn test_truncated_results_are_marked() {
        let mut snapshot = with_view(ResultsView::Loaded {
            rows: vec![result_row()],
        });
        snapshot.results.has_more = true;
        assert!(draw(&snapshot).contains("Results (first 1, m: more)"));
    }

    #[test]
    fn test_error_state() {
        let text = draw(&with_view(ResultsView::Error));
        assert!(text.contains("Results could not be loaded."));
    }

    #[test]
    fn test_unconfigured_session_has_no_table() {
        let mut snapshot = with_view(ResultsView::NotRequested);
        snapshot.editor.phase = EditorPhase::ReadyEmpty;
        let text = draw(&snapshot);
        assert!(text.contains("Save the search"));
        assert!(!text.contains("Domain"));
    }
}
