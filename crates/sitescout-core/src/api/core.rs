//! ScoutCore: the Facade entry-point for all front-ends.
//!
//! This struct owns the shared state, the backend and the selection context,
//! and exposes high-level methods. Consumers never acquire locks or talk to
//! the backend themselves.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::backend::SessionBackend;
use crate::config::Settings;
use crate::models::Page;
use crate::selection::{selection_channel, SelectionReader, SelectionWriter};
use crate::state::SharedState;

use super::events::CoreEvent;

/// Default broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The Facade that wraps all sitescout-core services.
///
/// Constructed via [`ScoutCoreBuilder`](super::builder::ScoutCoreBuilder).
pub struct ScoutCore<B> {
    /// Shared application state (directory, editor, results, notices)
    state: SharedState,
    /// Remote session service
    backend: Arc<B>,
    /// Sole writer of the selection
    selection: SelectionWriter,
    /// Reader continuations check their epoch against
    selection_rx: SelectionReader,
    /// Application settings
    settings: Arc<Settings>,
    /// Broadcast sender for core events
    event_tx: broadcast::Sender<CoreEvent>,
}

impl<B: SessionBackend> ScoutCore<B> {
    /// Create a new ScoutCore instance (prefer `ScoutCoreBuilder`)
    pub(crate) fn new(state: SharedState, backend: Arc<B>, settings: Arc<Settings>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (selection, selection_rx) = selection_channel();
        Self {
            state,
            backend,
            selection,
            selection_rx,
            settings,
            event_tx,
        }
    }

    /// Access application settings (read-only)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Access the backend
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// New read-only handle on the selection
    pub fn selection(&self) -> SelectionReader {
        self.selection.reader()
    }

    // =========================================================
    // Internal accessors for query/action impls
    // =========================================================

    /// Borrow the shared state
    pub(crate) fn state(&self) -> &SharedState {
        &self.state
    }

    /// Borrow the selection writer
    pub(crate) fn selection_writer(&self) -> &SelectionWriter {
        &self.selection
    }

    /// Borrow the core's own selection reader
    pub(crate) fn selection_reader(&self) -> &SelectionReader {
        &self.selection_rx
    }

    /// Window requested from list endpoints
    pub(crate) fn page(&self) -> Page {
        Page::first(self.settings.backend.page_size)
    }

    /// Broadcast an event; ignored when nobody listens
    pub(crate) fn emit(&self, event: CoreEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Get a clone of the broadcast event sender.
    pub(crate) fn event_sender(&self) -> broadcast::Sender<CoreEvent> {
        self.event_tx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::state::AppState;

    #[test]
    fn test_scout_core_creation() {
        let state = AppState::shared();
        let settings = Arc::new(Settings::default());
        let core = ScoutCore::new(state.clone(), Arc::new(MemoryBackend::new()), settings);

        assert_eq!(core.settings().backend.page_size, 50);
        assert_eq!(core.page(), Page::first(50));
        assert!(Arc::ptr_eq(core.state(), &state));
        assert_eq!(core.selection().selected(), None);
    }
}
