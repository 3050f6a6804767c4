//! Core event system for push-based change notification.
//!
//! Every committed state change emits one [`CoreEvent`]. Front-ends
//! subscribe to redraw or react (e.g. move the cursor to a new session)
//! without polling the state.

use tokio::sync::broadcast;

use crate::backend::SessionBackend;
use crate::editor::EditorPhase;
use crate::models::SessionId;
use crate::notice::NoticeKind;

use super::core::ScoutCore;

/// Events emitted by the core when state changes occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// The session list was replaced (fetch finished or failed)
    SessionsUpdated,

    /// A session was created and prepended to the list
    SessionCreated {
        /// New session id
        session_id: SessionId,
    },

    /// The selection changed
    SelectionChanged {
        /// Newly selected session, if any
        session_id: Option<SessionId>,
    },

    /// The editor changed phase or draft
    EditorUpdated {
        /// Phase after the change
        phase: EditorPhase,
    },

    /// The result viewer changed
    ResultsUpdated {
        /// Session the results belong to
        session_id: SessionId,
    },

    /// A notice was raised
    NoticeRaised {
        /// Notice id, for dismissal
        id: u64,
        /// Failed operation
        kind: NoticeKind,
    },
}

impl<B: SessionBackend> ScoutCore<B> {
    /// Subscribe to core events.
    ///
    /// Returns a broadcast receiver that will receive [`CoreEvent`]s.
    /// If the receiver falls behind, older events are dropped (lagged).
    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.event_sender().subscribe()
    }
}
