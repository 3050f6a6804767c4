//! Public API layer (Facade) for sitescout-core.
//!
//! This module provides [`ScoutCore`], a high-level entry-point that owns
//! the shared state, the backend and the selection, and exposes typed
//! query/action methods. Front-ends should use this API instead of
//! operating on `SharedState` or the backend directly.
//!
//! # Quick Start
//!
//! ```ignore
//! use sitescout_core::api::ScoutCoreBuilder;
//! use sitescout_core::backend::HttpBackend;
//!
//! let backend = Arc::new(HttpBackend::from_settings(&settings.backend));
//! let core = ScoutCoreBuilder::new(settings).build(backend);
//!
//! core.refresh_sessions().await?;
//! core.select_and_load(Some(session_id)).await?;
//!
//! let mut rx = core.subscribe();
//! ```

mod actions;
mod builder;
mod core;
pub mod events;
mod queries;
pub mod types;

pub use builder::ScoutCoreBuilder;
pub use core::ScoutCore;
pub use events::CoreEvent;
pub use types::{ApiError, Applied, EditorSnapshot, ResultsSnapshot};
