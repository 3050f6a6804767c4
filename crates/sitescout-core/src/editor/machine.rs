//! Editor state machine for the selected session's search configuration.
//!
//! Every transition goes through a method on [`SessionEditor`]. Network work
//! happens outside: callers start it from a ticket or epoch handed out here
//! and feed the outcome back through `apply_load` / `apply_save`, which drop
//! outcomes whose epoch is no longer the editor's.

use std::mem;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::draft::{validate, Draft, DraftEdit, ValidationErrors};
use crate::backend::BackendError;
use crate::models::{SearchConfiguration, SearchUpsert, SessionId};
use crate::selection::Epoch;

/// Externally visible editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorPhase {
    /// No session selected
    Idle,
    /// Fetching the saved configuration
    Loading,
    /// Draft available, backed by a saved configuration
    Ready,
    /// Draft available, session has no configuration yet
    ReadyEmpty,
    /// Persisting the draft
    Submitting,
    /// The configuration could not be loaded
    LoadFailed,
}

impl EditorPhase {
    /// Whether the form accepts edits and submits
    pub fn is_editable(&self) -> bool {
        matches!(self, EditorPhase::Ready | EditorPhase::ReadyEmpty)
    }

    /// Short label for the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorPhase::Idle => "Idle",
            EditorPhase::Loading => "Loading",
            EditorPhase::Ready => "Ready",
            EditorPhase::ReadyEmpty => "New",
            EditorPhase::Submitting => "Saving",
            EditorPhase::LoadFailed => "Error",
        }
    }
}

/// Draft, baseline and validation state of a loaded session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    pub session_id: SessionId,
    pub draft: Draft,
    /// Last configuration confirmed by the backend; `None` before the first save
    pub saved: Option<SearchConfiguration>,
    pub errors: ValidationErrors,
}

impl EditorForm {
    fn new(session_id: SessionId, saved: Option<SearchConfiguration>) -> Self {
        let draft = saved.as_ref().map(Draft::from).unwrap_or_default();
        Self {
            session_id,
            draft,
            saved,
            errors: ValidationErrors::default(),
        }
    }

    /// Whether the draft differs from what the backend has
    pub fn is_dirty(&self) -> bool {
        match &self.saved {
            Some(saved) => self.draft != Draft::from(saved),
            None => self.draft != Draft::default(),
        }
    }
}

#[derive(Debug, Clone)]
enum EditorState {
    Idle,
    Loading { session_id: SessionId },
    Ready(EditorForm),
    Submitting(EditorForm),
    LoadFailed { session_id: SessionId },
}

/// Why the editor refused an intent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// No draft is available (idle, loading or failed)
    #[error("editor is not ready")]
    NotReady,

    /// A submit is already outstanding
    #[error("a save is already in progress")]
    SubmitInFlight,

    /// Local validation rejected the draft
    #[error("draft is invalid")]
    Invalid(ValidationErrors),
}

/// Outcome of feeding a configuration load back into the editor
#[derive(Debug)]
pub enum LoadApplied {
    /// The epoch moved on; nothing changed
    Discarded,
    /// No configuration yet; default draft
    Empty,
    /// Draft and baseline populated; results should be fetched
    Loaded,
    /// The load failed; the editor is in `LoadFailed`
    Failed(BackendError),
}

/// Outcome of feeding a save back into the editor
#[derive(Debug)]
pub enum SaveApplied {
    /// The epoch moved on; nothing changed
    Discarded,
    /// Response adopted as draft and baseline; results should be refreshed
    Saved,
    /// The save failed; the draft is kept as typed
    Failed(BackendError),
}

/// Everything needed to run one save outside the lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub epoch: Epoch,
    pub session_id: SessionId,
    pub body: SearchUpsert,
}

/// State machine owning the selected session's draft
#[derive(Debug, Clone)]
pub struct SessionEditor {
    epoch: Epoch,
    state: EditorState,
}

impl Default for SessionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEditor {
    /// Create an idle editor
    pub fn new() -> Self {
        Self {
            epoch: Epoch::default(),
            state: EditorState::Idle,
        }
    }

    /// Re-initialize for a new selection epoch.
    ///
    /// Enters `Loading` when a session is selected, `Idle` otherwise. Any
    /// outcome still in flight for the previous epoch becomes stale.
    pub fn reset(&mut self, epoch: Epoch) {
        self.epoch = epoch;
        self.state = match epoch.session_id() {
            Some(session_id) => EditorState::Loading { session_id },
            None => EditorState::Idle,
        };
        debug!("Editor reset to {:?}", self.phase());
    }

    /// Epoch the editor currently belongs to
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Current phase
    pub fn phase(&self) -> EditorPhase {
        match &self.state {
            EditorState::Idle => EditorPhase::Idle,
            EditorState::Loading { .. } => EditorPhase::Loading,
            EditorState::Ready(form) if form.saved.is_none() => EditorPhase::ReadyEmpty,
            EditorState::Ready(_) => EditorPhase::Ready,
            EditorState::Submitting(_) => EditorPhase::Submitting,
            EditorState::LoadFailed { .. } => EditorPhase::LoadFailed,
        }
    }

    /// Session the editor is bound to
    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            EditorState::Idle => None,
            EditorState::Loading { session_id } | EditorState::LoadFailed { session_id } => {
                Some(*session_id)
            }
            EditorState::Ready(form) | EditorState::Submitting(form) => Some(form.session_id),
        }
    }

    /// Draft and baseline, when loaded
    pub fn form(&self) -> Option<&EditorForm> {
        match &self.state {
            EditorState::Ready(form) | EditorState::Submitting(form) => Some(form),
            _ => None,
        }
    }

    /// Feed back the configuration load started under `epoch`
    pub fn apply_load(
        &mut self,
        epoch: Epoch,
        outcome: Result<Option<SearchConfiguration>, BackendError>,
    ) -> LoadApplied {
        let session_id = match (&self.state, epoch == self.epoch) {
            (EditorState::Loading { session_id }, true) => *session_id,
            _ => {
                debug!(
                    "Discarding configuration load for {:?} (now {:?})",
                    epoch, self.epoch
                );
                return LoadApplied::Discarded;
            }
        };

        match outcome {
            Ok(None) => {
                self.state = EditorState::Ready(EditorForm::new(session_id, None));
                LoadApplied::Empty
            }
            Ok(Some(config)) => {
                self.state = EditorState::Ready(EditorForm::new(session_id, Some(config)));
                LoadApplied::Loaded
            }
            Err(err) => {
                self.state = EditorState::LoadFailed { session_id };
                LoadApplied::Failed(err)
            }
        }
    }

    /// Apply a user edit to the draft and clear that field's error
    pub fn edit(&mut self, edit: DraftEdit) -> Result<(), EditorError> {
        match &mut self.state {
            EditorState::Ready(form) => {
                form.errors.clear(edit.field());
                form.draft.apply(edit);
                Ok(())
            }
            EditorState::Submitting(_) => Err(EditorError::SubmitInFlight),
            _ => Err(EditorError::NotReady),
        }
    }

    /// Validate the draft and, if it passes, enter `Submitting`
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, EditorError> {
        let form = match &mut self.state {
            EditorState::Ready(form) => form,
            EditorState::Submitting(_) => return Err(EditorError::SubmitInFlight),
            _ => return Err(EditorError::NotReady),
        };

        let errors = validate(&form.draft);
        if !errors.is_empty() {
            form.errors = errors.clone();
            return Err(EditorError::Invalid(errors));
        }
        form.errors = ValidationErrors::default();

        let ticket = SubmitTicket {
            epoch: self.epoch,
            session_id: form.session_id,
            body: form.draft.to_upsert(),
        };
        self.state = match mem::replace(&mut self.state, EditorState::Idle) {
            EditorState::Ready(form) => EditorState::Submitting(form),
            other => other,
        };
        Ok(ticket)
    }

    /// Feed back the save started by `ticket`
    pub fn apply_save(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<SearchConfiguration, BackendError>,
    ) -> SaveApplied {
        if ticket.epoch != self.epoch || !matches!(self.state, EditorState::Submitting(_)) {
            debug!(
                "Discarding save for {:?} (now {:?})",
                ticket.epoch, self.epoch
            );
            return SaveApplied::Discarded;
        }
        let EditorState::Submitting(mut form) = mem::replace(&mut self.state, EditorState::Idle)
        else {
            return SaveApplied::Discarded;
        };

        let applied = match outcome {
            Ok(config) => {
                form.draft = Draft::from(&config);
                form.saved = Some(config);
                SaveApplied::Saved
            }
            Err(err) => SaveApplied::Failed(err),
        };
        self.state = EditorState::Ready(form);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::draft::{ISSUES_REQUIRED, MAX_RESULTS_POSITIVE, QUERY_REQUIRED};
    use crate::models::IssueKind;
    use crate::selection::selection_channel;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn config(session_id: SessionId, query: &str) -> SearchConfiguration {
        SearchConfiguration {
            session_id,
            query: query.to_string(),
            issues: BTreeSet::from([IssueKind::MissingTitle]),
            max_results_requested: 10,
            checked_websites_count: 0,
            last_search_cursor: None,
            is_completed: false,
        }
    }

    fn server_error() -> BackendError {
        BackendError::Status {
            status: 500,
            body: "boom".to_string(),
        }
    }

    fn ready_empty_editor() -> SessionEditor {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        let epoch = writer.select(Some(1)).unwrap();
        editor.reset(epoch);
        assert!(matches!(editor.apply_load(epoch, Ok(None)), LoadApplied::Empty));
        editor
    }

    #[test]
    fn test_reset_phases() {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        assert_eq!(editor.phase(), EditorPhase::Idle);

        editor.reset(writer.select(Some(3)).unwrap());
        assert_eq!(editor.phase(), EditorPhase::Loading);
        assert_eq!(editor.session_id(), Some(3));

        editor.reset(writer.select(None).unwrap());
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert!(editor.form().is_none());
    }

    #[test]
    fn test_not_found_gives_default_draft() {
        let editor = ready_empty_editor();
        assert_eq!(editor.phase(), EditorPhase::ReadyEmpty);
        let form = editor.form().unwrap();
        assert_eq!(form.draft, Draft::default());
        assert_eq!(form.saved, None);
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_loaded_configuration_sets_draft_and_baseline() {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        let epoch = writer.select(Some(5)).unwrap();
        editor.reset(epoch);

        let applied = editor.apply_load(epoch, Ok(Some(config(5, "bakeries"))));
        assert!(matches!(applied, LoadApplied::Loaded));
        assert_eq!(editor.phase(), EditorPhase::Ready);
        let form = editor.form().unwrap();
        assert_eq!(form.draft.query, "bakeries");
        assert_eq!(form.saved, Some(config(5, "bakeries")));
    }

    #[test]
    fn test_load_failure_enters_load_failed() {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        let epoch = writer.select(Some(5)).unwrap();
        editor.reset(epoch);

        let applied = editor.apply_load(epoch, Err(server_error()));
        assert!(matches!(applied, LoadApplied::Failed(_)));
        assert_eq!(editor.phase(), EditorPhase::LoadFailed);
        assert!(editor.form().is_none());
        assert_eq!(
            editor.edit(DraftEdit::Query("x".into())),
            Err(EditorError::NotReady)
        );
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        let a = writer.select(Some(1)).unwrap();
        editor.reset(a);
        let b = writer.select(Some(2)).unwrap();
        editor.reset(b);
        assert!(matches!(
            editor.apply_load(b, Ok(Some(config(2, "b")))),
            LoadApplied::Loaded
        ));
        let before = editor.form().cloned();

        let applied = editor.apply_load(a, Ok(Some(config(1, "a"))));
        assert!(matches!(applied, LoadApplied::Discarded));
        assert_eq!(editor.form().cloned(), before);
        assert_eq!(editor.session_id(), Some(2));
    }

    #[test]
    fn test_edit_clears_only_that_fields_error() {
        let mut editor = ready_empty_editor();
        let err = editor.begin_submit().unwrap_err();
        assert!(matches!(err, EditorError::Invalid(_)));

        editor.edit(DraftEdit::Query("site:example.com".into())).unwrap();
        let errors = &editor.form().unwrap().errors;
        assert_eq!(errors.query, None);
        assert_eq!(errors.issues, Some(ISSUES_REQUIRED));
        assert_eq!(errors.max_results, Some(MAX_RESULTS_POSITIVE));
        assert!(editor.form().unwrap().is_dirty());
    }

    #[test]
    fn test_invalid_submit_stays_ready() {
        let mut editor = ready_empty_editor();
        editor.edit(DraftEdit::MaxResults(10)).unwrap();
        editor
            .edit(DraftEdit::ToggleIssue(IssueKind::MissingTitle))
            .unwrap();

        let err = editor.begin_submit().unwrap_err();
        let EditorError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.query, Some(QUERY_REQUIRED));
        assert_eq!(editor.phase(), EditorPhase::ReadyEmpty);
        assert_eq!(editor.form().unwrap().errors, errors);
    }

    #[test]
    fn test_submit_success_adopts_response() {
        let mut editor = ready_empty_editor();
        editor.edit(DraftEdit::Query("site:example.com".into())).unwrap();
        editor.edit(DraftEdit::MaxResults(10)).unwrap();
        editor
            .edit(DraftEdit::ToggleIssue(IssueKind::MissingTitle))
            .unwrap();

        let ticket = editor.begin_submit().unwrap();
        assert_eq!(editor.phase(), EditorPhase::Submitting);
        assert_eq!(ticket.session_id, 1);
        assert_eq!(ticket.body.query, "site:example.com");
        assert_eq!(editor.begin_submit(), Err(EditorError::SubmitInFlight));
        assert_eq!(
            editor.edit(DraftEdit::MaxResults(3)),
            Err(EditorError::SubmitInFlight)
        );

        let mut normalized = config(1, "site:example.com");
        normalized.last_search_cursor = Some("cursor-0".to_string());
        let applied = editor.apply_save(&ticket, Ok(normalized.clone()));
        assert!(matches!(applied, SaveApplied::Saved));
        assert_eq!(editor.phase(), EditorPhase::Ready);
        let form = editor.form().unwrap();
        assert_eq!(form.saved, Some(normalized));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_submit_failure_keeps_draft() {
        let mut editor = ready_empty_editor();
        editor.edit(DraftEdit::Query("  typed ".into())).unwrap();
        editor.edit(DraftEdit::MaxResults(4)).unwrap();
        editor
            .edit(DraftEdit::ToggleIssue(IssueKind::MissingH1))
            .unwrap();
        let typed = editor.form().unwrap().draft.clone();

        let ticket = editor.begin_submit().unwrap();
        let applied = editor.apply_save(&ticket, Err(server_error()));
        assert!(matches!(applied, SaveApplied::Failed(_)));
        assert_eq!(editor.phase(), EditorPhase::ReadyEmpty);
        let form = editor.form().unwrap();
        assert_eq!(form.draft, typed);
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_save_after_selection_change_is_discarded() {
        let (writer, _reader) = selection_channel();
        let mut editor = SessionEditor::new();
        let a = writer.select(Some(1)).unwrap();
        editor.reset(a);
        editor.apply_load(a, Ok(Some(config(1, "a"))));
        let ticket = editor.begin_submit().unwrap();

        let b = writer.select(Some(2)).unwrap();
        editor.reset(b);
        let applied = editor.apply_save(&ticket, Ok(config(1, "a")));
        assert!(matches!(applied, SaveApplied::Discarded));
        assert_eq!(editor.phase(), EditorPhase::Loading);
        assert_eq!(editor.session_id(), Some(2));
    }
}
