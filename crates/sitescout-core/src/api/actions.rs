//! Action methods on [`ScoutCore`].
//!
//! Each action takes the write lock only to start or finish a transition and
//! never holds it across a backend call. Outcomes are fed back with the
//! epoch (or ticket) captured at the start, so a response that arrives after
//! the selection moved on is dropped without touching state.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, SessionBackend};
use crate::editor::{DraftEdit, EditorError, EditorPhase, LoadApplied, SaveApplied};
use crate::models::{SearchUpsert, Session, SessionId};
use crate::notice::NoticeKind;
use crate::selection::Epoch;

use super::core::ScoutCore;
use super::events::CoreEvent;
use super::types::{ApiError, Applied};

impl<B: SessionBackend> ScoutCore<B> {
    // =========================================================
    // Helpers
    // =========================================================

    /// Log the failure in full and raise the short user-facing notice
    fn raise_notice(&self, kind: NoticeKind, err: &BackendError) {
        warn!("{} ({})", kind.message(), err);
        let id = self.state().write().notices.raise(kind);
        self.emit(CoreEvent::NoticeRaised { id, kind });
    }

    /// Label the session after the query the backend now holds for it
    fn remember_saved_query(&self, session_id: SessionId) {
        {
            let mut state = self.state().write();
            let saved = state
                .editor
                .form()
                .and_then(|form| form.saved.as_ref())
                .map(|config| config.query.clone());
            let Some(query) = saved else {
                return;
            };
            state.directory.remember_query(session_id, query);
        }
        self.emit(CoreEvent::SessionsUpdated);
    }

    fn emit_editor(&self) {
        let phase = self.state().read().editor.phase();
        self.emit(CoreEvent::EditorUpdated { phase });
    }

    // =========================================================
    // Session directory
    // =========================================================

    /// Fetch the session list.
    ///
    /// On failure the list is emptied and a notice raised. A response
    /// superseded by a newer refresh is discarded.
    pub async fn refresh_sessions(&self) -> Result<Applied, ApiError> {
        let page = self.page();
        let ticket = self.state().write().directory.begin_list(page);
        self.emit(CoreEvent::SessionsUpdated);

        match self.backend().list_sessions(page).await {
            Ok(sessions) => {
                let count = sessions.len();
                let committed = {
                    let mut state = self.state().write();
                    let committed = state.directory.apply_list(ticket, Ok(sessions));
                    if committed {
                        state.last_sync = Some(Utc::now());
                    }
                    committed
                };
                if !committed {
                    return Ok(Applied::Discarded);
                }
                debug!("Loaded {} sessions", count);
                self.emit(CoreEvent::SessionsUpdated);
                Ok(Applied::Committed)
            }
            Err(err) => {
                let committed = self.state().write().directory.apply_list(ticket, Err(&err));
                if !committed {
                    return Ok(Applied::Discarded);
                }
                self.emit(CoreEvent::SessionsUpdated);
                self.raise_notice(NoticeKind::LoadSessions, &err);
                Err(err.into())
            }
        }
    }

    /// Create a new, unconfigured session and prepend it to the list.
    ///
    /// Rejected without a network call while another create is outstanding.
    pub async fn create_session(&self) -> Result<Session, ApiError> {
        self.state().write().directory.begin_create()?;

        match self.backend().create_session(SearchUpsert::default()).await {
            Ok(session) => {
                self.state()
                    .write()
                    .directory
                    .apply_create(Ok(session.clone()));
                info!("Created session {}", session.id);
                self.emit(CoreEvent::SessionCreated {
                    session_id: session.id,
                });
                Ok(session)
            }
            Err(err) => {
                self.state().write().directory.apply_create(Err(&err));
                self.raise_notice(NoticeKind::CreateSession, &err);
                Err(err.into())
            }
        }
    }

    // =========================================================
    // Selection
    // =========================================================

    /// Change the selection and re-initialize the editor and result viewer.
    ///
    /// Returns the new epoch, or `None` when `session_id` is already
    /// selected. The editor is left in `Loading`; call
    /// [`load_configuration`](Self::load_configuration) with the epoch.
    pub fn select_session(&self, session_id: Option<SessionId>) -> Option<Epoch> {
        let epoch = {
            let mut state = self.state().write();
            let epoch = self.selection_writer().select(session_id)?;
            state.editor.reset(epoch);
            state.results.reset(epoch);
            epoch
        };
        debug!("Selected {:?}", epoch);
        self.emit(CoreEvent::SelectionChanged { session_id });
        self.emit_editor();
        Some(epoch)
    }

    /// Select `session_id` and load its configuration (and results, if configured).
    pub async fn select_and_load(&self, session_id: Option<SessionId>) -> Result<Applied, ApiError> {
        match self.select_session(session_id) {
            Some(epoch) if epoch.session_id().is_some() => self.load_configuration(epoch).await,
            Some(_) => Ok(Applied::Committed),
            None => Ok(Applied::Discarded),
        }
    }

    // =========================================================
    // Editor
    // =========================================================

    /// Fetch the configuration of the session selected under `epoch`.
    ///
    /// A configured session also triggers a result fetch; a session without
    /// configuration gets a default draft and no result fetch.
    pub async fn load_configuration(&self, epoch: Epoch) -> Result<Applied, ApiError> {
        let session_id = epoch.session_id().ok_or(ApiError::NoSelection)?;
        if !self.selection_reader().is_current(&epoch) {
            return Ok(Applied::Discarded);
        }

        let outcome = self.backend().get_search(session_id).await;
        if !self.selection_reader().is_current(&epoch) {
            debug!("Selection moved on while loading session {}", session_id);
            return Ok(Applied::Discarded);
        }
        let applied = self.state().write().editor.apply_load(epoch, outcome);

        match applied {
            LoadApplied::Discarded => Ok(Applied::Discarded),
            LoadApplied::Empty => {
                debug!("Session {} has no search configuration yet", session_id);
                self.emit_editor();
                Ok(Applied::Committed)
            }
            LoadApplied::Loaded => {
                self.remember_saved_query(session_id);
                self.emit_editor();
                if let Err(err) = self.load_results(epoch).await {
                    debug!("Result fetch after load failed: {}", err);
                }
                Ok(Applied::Committed)
            }
            LoadApplied::Failed(err) => {
                self.emit_editor();
                self.raise_notice(NoticeKind::LoadSession, &err);
                Err(err.into())
            }
        }
    }

    /// Apply a user edit to the draft.
    pub fn edit_draft(&self, edit: DraftEdit) -> Result<(), ApiError> {
        self.state().write().editor.edit(edit)?;
        self.emit(CoreEvent::EditorUpdated {
            phase: self.state().read().editor.phase(),
        });
        Ok(())
    }

    /// Validate and persist the draft.
    ///
    /// Invalid drafts are rejected locally with
    /// [`EditorError::Invalid`]. On success the server's response becomes
    /// both draft and baseline and the results are re-fetched. On failure
    /// the draft is kept as typed and a notice is raised.
    pub async fn submit(&self) -> Result<Applied, ApiError> {
        let started = self.state().write().editor.begin_submit();
        let ticket = match started {
            Ok(ticket) => ticket,
            Err(err) => {
                if matches!(err, EditorError::Invalid(_)) {
                    self.emit_editor();
                }
                return Err(err.into());
            }
        };
        self.emit(CoreEvent::EditorUpdated {
            phase: EditorPhase::Submitting,
        });

        let outcome = self
            .backend()
            .put_search(ticket.session_id, ticket.body.clone())
            .await;
        let applied = self.state().write().editor.apply_save(&ticket, outcome);

        match applied {
            SaveApplied::Discarded => Ok(Applied::Discarded),
            SaveApplied::Saved => {
                info!("Saved search configuration of session {}", ticket.session_id);
                self.remember_saved_query(ticket.session_id);
                self.emit_editor();
                if let Err(err) = self.load_results(ticket.epoch).await {
                    debug!("Result refresh after save failed: {}", err);
                }
                Ok(Applied::Committed)
            }
            SaveApplied::Failed(err) => {
                self.emit_editor();
                self.raise_notice(NoticeKind::SaveSession, &err);
                Err(err.into())
            }
        }
    }

    // =========================================================
    // Results
    // =========================================================

    /// Fetch the result rows for the session selected under `epoch`.
    pub async fn load_results(&self, epoch: Epoch) -> Result<Applied, ApiError> {
        if !self.selection_reader().is_current(&epoch) {
            return Ok(Applied::Discarded);
        }
        let started = self.state().write().results.begin_fetch(epoch);
        let Some(session_id) = started else {
            return Ok(Applied::Discarded);
        };
        self.emit(CoreEvent::ResultsUpdated { session_id });

        let page = self.page();
        match self.backend().list_results(session_id, page).await {
            Ok(rows) => {
                let count = rows.len();
                if !self.state().write().results.apply_fetch(epoch, page, Ok(rows)) {
                    return Ok(Applied::Discarded);
                }
                debug!("Loaded {} results for session {}", count, session_id);
                self.emit(CoreEvent::ResultsUpdated { session_id });
                Ok(Applied::Committed)
            }
            Err(err) => {
                if !self.state().write().results.apply_fetch(epoch, page, Err(&err)) {
                    return Ok(Applied::Discarded);
                }
                self.emit(CoreEvent::ResultsUpdated { session_id });
                self.raise_notice(NoticeKind::LoadResults, &err);
                Err(err.into())
            }
        }
    }

    /// Re-fetch the results of the currently selected session.
    pub async fn refresh_results(&self) -> Result<Applied, ApiError> {
        let epoch = self.selection_reader().current();
        if epoch.session_id().is_none() {
            return Err(ApiError::NoSelection);
        }
        self.load_results(epoch).await
    }

    /// Append the next page of results of the selected session.
    ///
    /// Discarded when the last page was short, nothing is loaded yet or a
    /// follow-up is already outstanding.
    pub async fn load_more_results(&self) -> Result<Applied, ApiError> {
        let epoch = self.selection_reader().current();
        if epoch.session_id().is_none() {
            return Err(ApiError::NoSelection);
        }
        let limit = self.page().limit;
        let started = self.state().write().results.begin_more(epoch, limit);
        let Some(ticket) = started else {
            return Ok(Applied::Discarded);
        };
        let session_id = ticket.session_id;
        self.emit(CoreEvent::ResultsUpdated { session_id });

        match self.backend().list_results(session_id, ticket.page).await {
            Ok(rows) => {
                let count = rows.len();
                if !self.state().write().results.apply_more(&ticket, Ok(rows)) {
                    return Ok(Applied::Discarded);
                }
                debug!(
                    "Loaded {} more results for session {} from offset {}",
                    count, session_id, ticket.page.offset
                );
                self.emit(CoreEvent::ResultsUpdated { session_id });
                Ok(Applied::Committed)
            }
            Err(err) => {
                if !self.state().write().results.apply_more(&ticket, Err(&err)) {
                    return Ok(Applied::Discarded);
                }
                self.emit(CoreEvent::ResultsUpdated { session_id });
                self.raise_notice(NoticeKind::LoadResults, &err);
                Err(err.into())
            }
        }
    }

    // =========================================================
    // Notices
    // =========================================================

    /// Dismiss a notice by id; `false` if it was already gone.
    pub fn dismiss_notice(&self, id: u64) -> bool {
        self.state().write().notices.dismiss(id)
    }

    /// Dismiss all notices.
    pub fn clear_notices(&self) {
        self.state().write().notices.clear();
    }
}
