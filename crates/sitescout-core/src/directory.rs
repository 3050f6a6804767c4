//! Known sessions and session creation

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::backend::BackendError;
use crate::models::{Page, Session, SessionId};

/// Why the directory refused an intent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Another create request is still outstanding
    #[error("a session is already being created")]
    CreateInFlight,
}

/// Handle for one list request; only the newest may apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    generation: u64,
    page: Page,
}

/// Session list as last fetched, plus local creations
#[derive(Debug, Clone, Default)]
pub struct SessionDirectory {
    sessions: Vec<Session>,
    list_generation: u64,
    loading: bool,
    /// The last list filled its page; older sessions were not fetched
    truncated: bool,
    create_in_flight: bool,
    /// Saved queries seen so far, kept across re-fetches
    queries: HashMap<SessionId, String>,
}

impl SessionDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions in backend order, local creations first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Look up a session by id
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Whether a list request is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the backend may hold sessions beyond the listed ones
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether a create request is outstanding
    pub fn is_creating(&self) -> bool {
        self.create_in_flight
    }

    /// Start a list request for `page`; supersedes any earlier one
    pub fn begin_list(&mut self, page: Page) -> ListTicket {
        self.list_generation += 1;
        self.loading = true;
        ListTicket {
            generation: self.list_generation,
            page,
        }
    }

    /// Feed back a list request.
    ///
    /// A failure leaves the list empty. Returns `false` when a newer request
    /// superseded this one.
    pub fn apply_list(
        &mut self,
        ticket: ListTicket,
        outcome: Result<Vec<Session>, &BackendError>,
    ) -> bool {
        if ticket.generation != self.list_generation {
            debug!("Discarding superseded session list {:?}", ticket);
            return false;
        }
        self.loading = false;
        let mut sessions = outcome.unwrap_or_default();
        self.truncated = ticket.page.is_filled_by(sessions.len());
        for session in &mut sessions {
            session.query = self.queries.get(&session.id).cloned();
        }
        self.sessions = sessions;
        true
    }

    /// Record the saved query of a session so it can label it
    pub fn remember_query(&mut self, id: SessionId, query: String) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            session.query = Some(query.clone());
        }
        self.queries.insert(id, query);
    }

    /// Claim the single create slot
    pub fn begin_create(&mut self) -> Result<(), DirectoryError> {
        if self.create_in_flight {
            return Err(DirectoryError::CreateInFlight);
        }
        self.create_in_flight = true;
        Ok(())
    }

    /// Feed back a create request and release the slot.
    ///
    /// On success the new session is prepended; on failure nothing changes.
    pub fn apply_create(&mut self, outcome: Result<Session, &BackendError>) {
        self.create_in_flight = false;
        if let Ok(session) = outcome {
            self.sessions.retain(|s| s.id != session.id);
            self.sessions.insert(0, session);
        }
    }
}
