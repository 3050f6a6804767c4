//! Builder for constructing a [`ScoutCore`] instance.
//!
//! ```ignore
//! let core = ScoutCoreBuilder::new(settings)
//!     .with_state(state)
//!     .build(Arc::new(HttpBackend::from_settings(&settings.backend)));
//! ```

use std::sync::Arc;

use crate::backend::SessionBackend;
use crate::config::Settings;
use crate::state::{AppState, SharedState};

use super::core::ScoutCore;

/// Builder for constructing a [`ScoutCore`] Facade instance
pub struct ScoutCoreBuilder {
    settings: Arc<Settings>,
    state: Option<SharedState>,
}

impl ScoutCoreBuilder {
    /// Create a new builder with the given settings
    pub fn new(settings: Settings) -> Self {
        Self::from_shared_settings(Arc::new(settings))
    }

    /// Create a new builder from an already-shared settings
    pub fn from_shared_settings(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            state: None,
        }
    }

    /// Use an existing shared state instead of creating a new one
    pub fn with_state(mut self, state: SharedState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the `ScoutCore` instance talking to `backend`
    ///
    /// If no state was provided, a fresh `AppState::shared()` is created.
    pub fn build<B: SessionBackend>(self, backend: Arc<B>) -> ScoutCore<B> {
        let state = self.state.unwrap_or_else(AppState::shared);

        ScoutCore::new(state, backend, self.settings)
    }
}
