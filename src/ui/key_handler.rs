//! Key handler logic.
//!
//! [`resolve_key`] reads the frame snapshot and the view-local state to
//! decide what to do, returning a [`KeyAction`] that the App hands to the
//! core afterwards. Cursor-only changes are applied to [`UiState`] directly.

use crossterm::event::{KeyCode, KeyModifiers};
use sitescout_core::editor::DraftEdit;
use sitescout_core::models::SessionId;

use super::view::{Focus, FormField, Snapshot, UiState};

/// Action to execute against the core after key resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    Quit,
    RefreshSessions,
    CreateSession,
    /// Change the selection (`None` deselects)
    Select(Option<SessionId>),
    /// Apply an edit to the draft
    Edit(DraftEdit),
    Submit,
    RefreshResults,
    /// Fetch the page after the loaded result rows
    LoadMoreResults,
    DismissNotice(u64),
    ClearNotices,
}

/// Decide what a key press means in the current view
pub fn resolve_key(
    ui: &mut UiState,
    snapshot: &Snapshot,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> KeyAction {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    // Any key closes the help popup
    if ui.show_help {
        ui.show_help = false;
        return KeyAction::None;
    }

    match code {
        KeyCode::Tab => {
            ui.focus = ui.focus.next();
            return KeyAction::None;
        }
        KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
            return submit_if_editable(snapshot);
        }
        _ => {}
    }

    if ui.is_typing() {
        return resolve_query_key(ui, snapshot, code);
    }

    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('?') => {
            ui.toggle_help();
            return KeyAction::None;
        }
        KeyCode::Char('d') => {
            return snapshot
                .notice
                .as_ref()
                .map_or(KeyAction::None, |n| KeyAction::DismissNotice(n.id));
        }
        KeyCode::Char('D') if snapshot.notice_count > 0 => return KeyAction::ClearNotices,
        _ => {}
    }

    match ui.focus {
        Focus::Sessions => resolve_sessions_key(ui, snapshot, code),
        Focus::Form => resolve_form_key(ui, snapshot, code),
        Focus::Results => resolve_results_key(ui, snapshot, code),
    }
}

fn resolve_sessions_key(ui: &mut UiState, snapshot: &Snapshot, code: KeyCode) -> KeyAction {
    let len = snapshot.sessions.len();
    match code {
        KeyCode::Char('j') | KeyCode::Down => ui.move_list_cursor(1, len),
        KeyCode::Char('k') | KeyCode::Up => ui.move_list_cursor(-1, len),
        KeyCode::Char('g') => ui.list_cursor = 0,
        KeyCode::Char('G') => ui.list_cursor = len.saturating_sub(1),
        KeyCode::Enter => {
            return snapshot
                .session_at(ui.list_cursor)
                .map_or(KeyAction::None, |s| KeyAction::Select(Some(s.id)));
        }
        KeyCode::Char('n') if !snapshot.creating => return KeyAction::CreateSession,
        KeyCode::Char('r') => return KeyAction::RefreshSessions,
        KeyCode::Char('x') if snapshot.selected.is_some() => return KeyAction::Select(None),
        KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::None
}

fn resolve_form_key(ui: &mut UiState, snapshot: &Snapshot, code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            ui.form_field = ui.form_field.next();
            return KeyAction::None;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            ui.form_field = ui.form_field.previous();
            if ui.form_field == FormField::Query {
                ui.query_cursor = snapshot.query().chars().count();
            }
            return KeyAction::None;
        }
        KeyCode::Esc => {
            ui.focus = Focus::Sessions;
            return KeyAction::None;
        }
        _ => {}
    }

    let Some(draft) = snapshot.editor.draft.as_ref() else {
        return KeyAction::None;
    };
    if !snapshot.editor.phase.is_editable() {
        return KeyAction::None;
    }

    match (ui.form_field, code) {
        (FormField::MaxResults, KeyCode::Char(c)) if c.is_ascii_digit() => {
            let digit = i64::from(c.to_digit(10).unwrap_or(0));
            let value = draft.max_results.max(0).saturating_mul(10).saturating_add(digit);
            KeyAction::Edit(DraftEdit::MaxResults(value))
        }
        (FormField::MaxResults, KeyCode::Backspace) => {
            KeyAction::Edit(DraftEdit::MaxResults(draft.max_results / 10))
        }
        (FormField::MaxResults, KeyCode::Enter) => KeyAction::Submit,
        (FormField::Issue(_), KeyCode::Char(' ') | KeyCode::Enter) => ui
            .form_field
            .issue()
            .map_or(KeyAction::None, |kind| KeyAction::Edit(DraftEdit::ToggleIssue(kind))),
        _ => KeyAction::None,
    }
}

/// Keys while the query field has focus; printable characters are text
fn resolve_query_key(ui: &mut UiState, snapshot: &Snapshot, code: KeyCode) -> KeyAction {
    let query = snapshot.query();
    let len = query.chars().count();
    ui.query_cursor = ui.query_cursor.min(len);

    match code {
        KeyCode::Esc => ui.focus = Focus::Sessions,
        KeyCode::Down => ui.form_field = ui.form_field.next(),
        KeyCode::Up => ui.form_field = ui.form_field.previous(),
        KeyCode::Left => ui.query_cursor = ui.query_cursor.saturating_sub(1),
        KeyCode::Right => ui.query_cursor = (ui.query_cursor + 1).min(len),
        KeyCode::Home => ui.query_cursor = 0,
        KeyCode::End => ui.query_cursor = len,
        KeyCode::Enter => return submit_if_editable(snapshot),
        KeyCode::Char(c) if snapshot.editor.phase.is_editable() => {
            let mut chars: Vec<char> = query.chars().collect();
            chars.insert(ui.query_cursor, c);
            ui.query_cursor += 1;
            return KeyAction::Edit(DraftEdit::Query(chars.into_iter().collect()));
        }
        KeyCode::Backspace if ui.query_cursor > 0 && snapshot.editor.phase.is_editable() => {
            let mut chars: Vec<char> = query.chars().collect();
            ui.query_cursor -= 1;
            chars.remove(ui.query_cursor);
            return KeyAction::Edit(DraftEdit::Query(chars.into_iter().collect()));
        }
        KeyCode::Delete if ui.query_cursor < len && snapshot.editor.phase.is_editable() => {
            let mut chars: Vec<char> = query.chars().collect();
            chars.remove(ui.query_cursor);
            return KeyAction::Edit(DraftEdit::Query(chars.into_iter().collect()));
        }
        _ => {}
    }
    KeyAction::None
}

fn resolve_results_key(ui: &mut UiState, snapshot: &Snapshot, code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Char('j') | KeyCode::Down => ui.results_offset += 1,
        KeyCode::Char('k') | KeyCode::Up => ui.results_offset = ui.results_offset.saturating_sub(1),
        KeyCode::Char('g') => ui.results_offset = 0,
        KeyCode::Char('r') if snapshot.selected.is_some() => return KeyAction::RefreshResults,
        KeyCode::Char('m') if snapshot.results.has_more && !snapshot.results.loading_more => {
            return KeyAction::LoadMoreResults;
        }
        KeyCode::Esc => ui.focus = Focus::Sessions,
        _ => {}
    }
    KeyAction::None
}

fn submit_if_editable(snapshot: &Snapshot) -> KeyAction {
    if snapshot.editor.phase.is_editable() {
        KeyAction::Submit
    } else {
        KeyAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use sitescout_core::api::{EditorSnapshot, ResultsSnapshot};
    use sitescout_core::editor::{Draft, EditorPhase, ValidationErrors};
    use sitescout_core::models::{IssueKind, Session};
    use sitescout_core::notice::{Notice, NoticeKind};
    use sitescout_core::results::ResultsView;

    fn snapshot(phase: EditorPhase, draft: Option<Draft>) -> Snapshot {
        let sessions = (1..=3)
            .map(|id| Session {
                id,
                created_at: Utc::now(),
                name: format!("s{}", id),
                is_configured: false,
                is_completed: false,
                query: None,
            })
            .collect();
        Snapshot {
            sessions,
            sessions_loading: false,
            sessions_truncated: false,
            creating: false,
            selected: draft.as_ref().map(|_| 1),
            editor: EditorSnapshot {
                phase,
                session_id: draft.as_ref().map(|_| 1),
                draft,
                saved: None,
                errors: ValidationErrors::default(),
                dirty: false,
            },
            results: ResultsSnapshot {
                session_id: None,
                view: ResultsView::NotRequested,
                ..Default::default()
            },
            notice: None,
            notice_count: 0,
            last_sync: None,
        }
    }

    fn ready(query: &str, max_results: i64) -> Snapshot {
        snapshot(
            EditorPhase::ReadyEmpty,
            Some(Draft {
                query: query.to_string(),
                max_results,
                ..Default::default()
            }),
        )
    }

    fn press(ui: &mut UiState, snapshot: &Snapshot, code: KeyCode) -> KeyAction {
        resolve_key(ui, snapshot, code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_selects_session_under_cursor() {
        let snap = snapshot(EditorPhase::Idle, None);
        let mut ui = UiState::new();
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('j')), KeyAction::None);
        assert_eq!(press(&mut ui, &snap, KeyCode::Enter), KeyAction::Select(Some(2)));
    }

    #[test]
    fn test_create_disabled_while_creating() {
        let mut snap = snapshot(EditorPhase::Idle, None);
        let mut ui = UiState::new();
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('n')), KeyAction::CreateSession);
        snap.creating = true;
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('n')), KeyAction::None);
    }

    #[test]
    fn test_query_typing_inserts_at_cursor() {
        let snap = ready("bakery", 0);
        let mut ui = UiState::new();
        ui.focus = Focus::Form;
        ui.query_cursor = 0;

        assert_eq!(
            press(&mut ui, &snap, KeyCode::Char('q')),
            KeyAction::Edit(DraftEdit::Query("qbakery".into()))
        );
        assert_eq!(ui.query_cursor, 1);
    }

    #[test]
    fn test_query_backspace_and_delete() {
        let snap = ready("abc", 0);
        let mut ui = UiState::new();
        ui.focus = Focus::Form;
        ui.query_cursor = 3;

        assert_eq!(
            press(&mut ui, &snap, KeyCode::Backspace),
            KeyAction::Edit(DraftEdit::Query("ab".into()))
        );
        ui.query_cursor = 0;
        assert_eq!(
            press(&mut ui, &snap, KeyCode::Delete),
            KeyAction::Edit(DraftEdit::Query("bc".into()))
        );
    }

    #[test]
    fn test_max_results_digits() {
        let snap = ready("", 4);
        let mut ui = UiState::new();
        ui.focus = Focus::Form;
        ui.form_field = FormField::MaxResults;

        assert_eq!(
            press(&mut ui, &snap, KeyCode::Char('2')),
            KeyAction::Edit(DraftEdit::MaxResults(42))
        );
        assert_eq!(
            press(&mut ui, &snap, KeyCode::Backspace),
            KeyAction::Edit(DraftEdit::MaxResults(0))
        );
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('x')), KeyAction::None);
    }

    #[test]
    fn test_space_toggles_issue() {
        let snap = ready("", 1);
        let mut ui = UiState::new();
        ui.focus = Focus::Form;
        ui.form_field = FormField::Issue(1);

        assert_eq!(
            press(&mut ui, &snap, KeyCode::Char(' ')),
            KeyAction::Edit(DraftEdit::ToggleIssue(IssueKind::all_variants()[1]))
        );
    }

    #[test]
    fn test_no_edits_without_editable_draft() {
        let snap = snapshot(EditorPhase::Loading, None);
        let mut ui = UiState::new();
        ui.focus = Focus::Form;

        assert_eq!(press(&mut ui, &snap, KeyCode::Char('a')), KeyAction::None);
        assert_eq!(press(&mut ui, &snap, KeyCode::Enter), KeyAction::None);
    }

    #[test]
    fn test_ctrl_s_submits() {
        let snap = ready("x", 1);
        let mut ui = UiState::new();
        assert_eq!(
            resolve_key(&mut ui, &snap, KeyCode::Char('s'), KeyModifiers::CONTROL),
            KeyAction::Submit
        );
    }

    #[test]
    fn test_q_types_in_query_but_quits_elsewhere() {
        let snap = ready("", 0);
        let mut ui = UiState::new();
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('q')), KeyAction::Quit);

        ui.focus = Focus::Form;
        assert_eq!(
            press(&mut ui, &snap, KeyCode::Char('q')),
            KeyAction::Edit(DraftEdit::Query("q".into()))
        );
    }

    #[test]
    fn test_help_swallows_next_key() {
        let snap = snapshot(EditorPhase::Idle, None);
        let mut ui = UiState::new();
        press(&mut ui, &snap, KeyCode::Char('?'));
        assert!(ui.show_help);
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('q')), KeyAction::None);
        assert!(!ui.show_help);
    }

    #[test]
    fn test_dismiss_latest_notice() {
        let mut snap = snapshot(EditorPhase::Idle, None);
        snap.notice = Some(Notice {
            id: 7,
            kind: NoticeKind::LoadResults,
            message: NoticeKind::LoadResults.message(),
            raised_at: Utc::now(),
        });
        let mut ui = UiState::new();
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('d')), KeyAction::DismissNotice(7));
    }

    #[test]
    fn test_results_refresh_needs_selection() {
        let mut ui = UiState::new();
        ui.focus = Focus::Results;
        let idle = snapshot(EditorPhase::Idle, None);
        assert_eq!(press(&mut ui, &idle, KeyCode::Char('r')), KeyAction::None);

        let selected = ready("x", 1);
        assert_eq!(press(&mut ui, &selected, KeyCode::Char('r')), KeyAction::RefreshResults);
    }

    #[test]
    fn test_load_more_only_after_full_page() {
        let mut ui = UiState::new();
        ui.focus = Focus::Results;
        let mut snap = ready("x", 1);
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('m')), KeyAction::None);

        snap.results.has_more = true;
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('m')), KeyAction::LoadMoreResults);

        snap.results.loading_more = true;
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('m')), KeyAction::None);
    }

    #[test]
    fn test_clear_all_notices() {
        let mut snap = snapshot(EditorPhase::Idle, None);
        let mut ui = UiState::new();
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('D')), KeyAction::None);

        snap.notice_count = 3;
        assert_eq!(press(&mut ui, &snap, KeyCode::Char('D')), KeyAction::ClearNotices);
    }
}
