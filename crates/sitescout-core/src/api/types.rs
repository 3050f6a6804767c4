//! Owned snapshot types for the Facade API.
//!
//! These types are returned by query methods and do not hold any lock.
//! They are safe to pass across async boundaries and to serialize.

use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::directory::DirectoryError;
use crate::editor::{Draft, EditorError, EditorPhase, SessionEditor, ValidationErrors};
use crate::models::{SearchConfiguration, SessionId};
use crate::results::{ResultViewer, ResultsView};

/// Error type for Facade API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No session is currently selected
    #[error("no session selected")]
    NoSelection,

    /// The session directory refused the request
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The editor refused the request
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// The backend call failed (a notice has been raised)
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),
}

impl ApiError {
    /// Validation messages, when the error is a rejected draft
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Editor(EditorError::Invalid(errors)) => Some(errors),
            _ => None,
        }
    }
}

/// Whether an asynchronous outcome was committed to state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The outcome changed state
    Committed,
    /// The selection moved on (or the request was superseded); nothing changed
    Discarded,
}

/// Owned view of the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSnapshot {
    pub phase: EditorPhase,
    pub session_id: Option<SessionId>,
    /// Present in `Ready`, `ReadyEmpty` and `Submitting`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<Draft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SearchConfiguration>,
    pub errors: ValidationErrors,
    pub dirty: bool,
}

impl EditorSnapshot {
    /// Snapshot the editor's current state
    pub fn from_editor(editor: &SessionEditor) -> Self {
        let form = editor.form();
        Self {
            phase: editor.phase(),
            session_id: editor.session_id(),
            draft: form.map(|f| f.draft.clone()),
            saved: form.and_then(|f| f.saved.clone()),
            errors: form.map(|f| f.errors.clone()).unwrap_or_default(),
            dirty: form.is_some_and(|f| f.is_dirty()),
        }
    }
}

/// Owned view of the result viewer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultsSnapshot {
    pub session_id: Option<SessionId>,
    pub view: ResultsView,
    /// The backend may hold rows beyond the loaded ones
    pub has_more: bool,
    pub loading_more: bool,
}

impl ResultsSnapshot {
    /// Snapshot the viewer's current state
    pub fn from_viewer(viewer: &ResultViewer) -> Self {
        Self {
            session_id: viewer.session_id(),
            view: viewer.view().clone(),
            has_more: viewer.has_more(),
            loading_more: viewer.is_loading_more(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::QUERY_REQUIRED;

    #[test]
    fn test_idle_editor_snapshot() {
        let snapshot = EditorSnapshot::from_editor(&SessionEditor::new());
        assert_eq!(snapshot.phase, EditorPhase::Idle);
        assert_eq!(snapshot.session_id, None);
        assert!(snapshot.draft.is_none());
        assert!(!snapshot.dirty);
    }

    #[test]
    fn test_validation_errors_accessor() {
        let errors = ValidationErrors {
            query: Some(QUERY_REQUIRED),
            ..Default::default()
        };
        let err = ApiError::from(EditorError::Invalid(errors.clone()));
        assert_eq!(err.validation_errors(), Some(&errors));
        assert!(ApiError::NoSelection.validation_errors().is_none());
    }
}
