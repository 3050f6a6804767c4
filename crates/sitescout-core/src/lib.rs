//! Client-side state synchronization for sitescout search sessions.
//!
//! The [`api::ScoutCore`] facade ties together the session directory, the
//! process-wide selection, the search editor state machine and the result
//! viewer over a [`backend::SessionBackend`].

pub mod api;
pub mod backend;
pub mod config;
pub mod directory;
pub mod editor;
pub mod models;
pub mod notice;
pub mod results;
pub mod selection;
pub mod state;
