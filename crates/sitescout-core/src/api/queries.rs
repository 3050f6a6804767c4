//! Read-only query methods on [`ScoutCore`].
//!
//! Every method acquires a read lock internally, converts to owned snapshots,
//! and releases the lock before returning. Callers never hold a lock.

use crate::backend::SessionBackend;
use crate::models::{Session, SessionId};
use crate::notice::Notice;

use super::core::ScoutCore;
use super::types::{EditorSnapshot, ResultsSnapshot};

impl<B: SessionBackend> ScoutCore<B> {
    // =========================================================
    // Directory queries
    // =========================================================

    /// List known sessions in display order.
    pub fn list_sessions(&self) -> Vec<Session> {
        let state = self.state().read();
        state.directory.sessions().to_vec()
    }

    /// Whether a session list request is outstanding.
    pub fn sessions_loading(&self) -> bool {
        let state = self.state().read();
        state.directory.is_loading()
    }

    /// Whether older sessions exist beyond the fetched page.
    pub fn sessions_truncated(&self) -> bool {
        let state = self.state().read();
        state.directory.is_truncated()
    }

    /// Whether a create request is outstanding (the create control is disabled).
    pub fn is_creating(&self) -> bool {
        let state = self.state().read();
        state.directory.is_creating()
    }

    /// When the session list last loaded successfully.
    pub fn last_sync(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let state = self.state().read();
        state.last_sync
    }

    // =========================================================
    // Selection queries
    // =========================================================

    /// Currently selected session id.
    pub fn selected_session_id(&self) -> Option<SessionId> {
        self.selection_reader().selected()
    }

    /// Currently selected session, if it is in the list.
    pub fn selected_session(&self) -> Option<Session> {
        let id = self.selected_session_id()?;
        let state = self.state().read();
        state.directory.get(id).cloned()
    }

    // =========================================================
    // Editor / results queries
    // =========================================================

    /// Snapshot of the editor.
    pub fn editor(&self) -> EditorSnapshot {
        let state = self.state().read();
        EditorSnapshot::from_editor(&state.editor)
    }

    /// Snapshot of the result viewer.
    pub fn results(&self) -> ResultsSnapshot {
        let state = self.state().read();
        ResultsSnapshot::from_viewer(&state.results)
    }

    // =========================================================
    // Notices
    // =========================================================

    /// All pending notices, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        let state = self.state().read();
        state.notices.all().to_vec()
    }

    /// Newest pending notice.
    pub fn latest_notice(&self) -> Option<Notice> {
        let state = self.state().read();
        state.notices.latest().cloned()
    }
}
