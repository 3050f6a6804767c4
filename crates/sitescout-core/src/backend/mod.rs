//! Remote session service seam.
//!
//! [`SessionBackend`] is the request/response surface the core consumes.
//! [`HttpBackend`] talks to the real REST service; [`MemoryBackend`] keeps
//! everything in process (demo mode and tests).

mod http;
mod memory;

use std::future::Future;

use thiserror::Error;

use crate::models::{Page, ResultRow, SearchConfiguration, SearchUpsert, Session, SessionId};

pub use http::HttpBackend;
pub use memory::{BackendOp, MemoryBackend};

/// Transport or server failure of a single backend call
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (connect, TLS, body read)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// HTTP status of the failure, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Transport(err) => err.status().map(|s| s.as_u16()),
            BackendError::Decode(_) => None,
        }
    }
}

/// Request/response API of the session service.
///
/// Every call is a single attempt; callers decide what a failure means.
pub trait SessionBackend: Send + Sync + 'static {
    /// `GET /sessions`
    fn list_sessions(
        &self,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Session>, BackendError>> + Send;

    /// `POST /sessions`
    fn create_session(
        &self,
        body: SearchUpsert,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// `GET /sessions/{id}/search`; `Ok(None)` when the session has no configuration yet
    fn get_search(
        &self,
        session_id: SessionId,
    ) -> impl Future<Output = Result<Option<SearchConfiguration>, BackendError>> + Send;

    /// `PUT /sessions/{id}/search` (create-or-update)
    fn put_search(
        &self,
        session_id: SessionId,
        body: SearchUpsert,
    ) -> impl Future<Output = Result<SearchConfiguration, BackendError>> + Send;

    /// `GET /sessions/{id}/results`
    fn list_results(
        &self,
        session_id: SessionId,
        page: Page,
    ) -> impl Future<Output = Result<Vec<ResultRow>, BackendError>> + Send;
}
