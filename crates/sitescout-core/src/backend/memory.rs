//! In-process session service used by demo mode and tests

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::{BackendError, SessionBackend};
use crate::models::{Page, ResultRow, SearchConfiguration, SearchUpsert, Session, SessionId};

/// Name the service gives to sessions it creates
const DEFAULT_SESSION_NAME: &str = "Untitled session";

/// Backend operation, used to count calls and inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendOp {
    ListSessions,
    CreateSession,
    GetSearch,
    PutSearch,
    ListResults,
}

#[derive(Debug, Default)]
struct Store {
    next_session_id: SessionId,
    /// Newest first, like the real service orders them
    sessions: Vec<Session>,
    searches: HashMap<SessionId, SearchConfiguration>,
    results: HashMap<SessionId, Vec<ResultRow>>,
    calls: HashMap<BackendOp, usize>,
    fail_next: HashSet<BackendOp>,
    held: HashMap<BackendOp, VecDeque<oneshot::Receiver<()>>>,
}

/// [`SessionBackend`] that keeps all data in memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    store: Mutex<Store>,
    latency: Duration,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Insert a session directly (bypasses call counting)
    pub fn seed_session(&self, name: &str) -> Session {
        let mut store = self.store.lock();
        store.next_session_id += 1;
        let session = Session {
            id: store.next_session_id,
            created_at: Utc::now(),
            name: name.to_string(),
            is_configured: false,
            is_completed: false,
            query: None,
        };
        store.sessions.insert(0, session.clone());
        session
    }

    /// Store a search configuration for an existing session
    pub fn seed_search(&self, config: SearchConfiguration) {
        let mut store = self.store.lock();
        let session_id = config.session_id;
        if let Some(session) = store.sessions.iter_mut().find(|s| s.id == session_id) {
            session.is_configured = true;
            session.is_completed = config.is_completed;
        }
        store.searches.insert(session_id, config);
    }

    /// Replace the result rows of a session
    pub fn seed_results(&self, session_id: SessionId, rows: Vec<ResultRow>) {
        self.store.lock().results.insert(session_id, rows);
    }

    /// Number of calls made for `op` so far
    pub fn calls(&self, op: BackendOp) -> usize {
        self.store.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Make the next call of `op` fail with a 500
    pub fn fail_next(&self, op: BackendOp) {
        self.store.lock().fail_next.insert(op);
    }

    /// Park the next call of `op` until the returned sender fires or is dropped
    pub fn hold_next(&self, op: BackendOp) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.store.lock().held.entry(op).or_default().push_back(rx);
        tx
    }

    /// Count the call, wait out latency and holds, then report an injected failure if any
    async fn enter(&self, op: BackendOp) -> Result<(), BackendError> {
        let hold = {
            let mut store = self.store.lock();
            *store.calls.entry(op).or_insert(0) += 1;
            store.held.get_mut(&op).and_then(VecDeque::pop_front)
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if let Some(rx) = hold {
            let _ = rx.await;
        }

        if self.store.lock().fail_next.remove(&op) {
            return Err(BackendError::Status {
                status: 500,
                body: format!("injected failure for {:?}", op),
            });
        }
        Ok(())
    }

    fn not_found(what: &str) -> BackendError {
        BackendError::Status {
            status: 404,
            body: format!("{} not found", what),
        }
    }

    fn window<T: Clone>(items: &[T], page: Page) -> Vec<T> {
        items
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }
}

impl SessionBackend for MemoryBackend {
    async fn list_sessions(&self, page: Page) -> Result<Vec<Session>, BackendError> {
        self.enter(BackendOp::ListSessions).await?;
        let store = self.store.lock();
        Ok(Self::window(&store.sessions, page))
    }

    async fn create_session(&self, _body: SearchUpsert) -> Result<Session, BackendError> {
        self.enter(BackendOp::CreateSession).await?;
        // The service ignores the initial body and starts unconfigured
        Ok(self.seed_session(DEFAULT_SESSION_NAME))
    }

    async fn get_search(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SearchConfiguration>, BackendError> {
        self.enter(BackendOp::GetSearch).await?;
        Ok(self.store.lock().searches.get(&session_id).cloned())
    }

    async fn put_search(
        &self,
        session_id: SessionId,
        body: SearchUpsert,
    ) -> Result<SearchConfiguration, BackendError> {
        self.enter(BackendOp::PutSearch).await?;
        let mut store = self.store.lock();
        let Some(session) = store.sessions.iter_mut().find(|s| s.id == session_id) else {
            return Err(Self::not_found("Session"));
        };
        session.is_configured = true;
        session.name = body.query.clone();

        let issues: BTreeSet<_> = body.issues.into_iter().collect();
        let config = match store.searches.get(&session_id) {
            Some(existing) => SearchConfiguration {
                query: body.query,
                issues,
                max_results_requested: body.max_results,
                ..existing.clone()
            },
            None => SearchConfiguration {
                session_id,
                query: body.query,
                issues,
                max_results_requested: body.max_results,
                checked_websites_count: 0,
                last_search_cursor: None,
                is_completed: false,
            },
        };
        store.searches.insert(session_id, config.clone());
        Ok(config)
    }

    async fn list_results(
        &self,
        session_id: SessionId,
        page: Page,
    ) -> Result<Vec<ResultRow>, BackendError> {
        self.enter(BackendOp::ListResults).await?;
        let store = self.store.lock();
        let rows = store
            .results
            .get(&session_id)
            .map(|rows| Self::window(rows, page))
            .unwrap_or_default();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let backend = MemoryBackend::new();
        let first = backend.create_session(SearchUpsert::default()).await.unwrap();
        let second = backend.create_session(SearchUpsert::default()).await.unwrap();

        let sessions = backend.list_sessions(Page::default()).await.unwrap();
        let ids: Vec<_> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(backend.calls(BackendOp::CreateSession), 2);
        assert_eq!(backend.calls(BackendOp::ListSessions), 1);
    }

    #[tokio::test]
    async fn test_put_search_creates_then_updates() {
        let backend = MemoryBackend::new();
        let session = backend.seed_session("x");
        assert_eq!(backend.get_search(session.id).await.unwrap(), None);

        let body = SearchUpsert {
            query: "dentists".to_string(),
            issues: vec![IssueKind::MissingH1],
            max_results: 5,
        };
        let created = backend.put_search(session.id, body.clone()).await.unwrap();
        assert_eq!(created.max_results_requested, 5);
        assert_eq!(created.checked_websites_count, 0);

        backend.seed_search(SearchConfiguration {
            checked_websites_count: 3,
            ..created
        });
        let updated = backend
            .put_search(
                session.id,
                SearchUpsert {
                    max_results: 8,
                    ..body
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.max_results_requested, 8);
        assert_eq!(updated.checked_websites_count, 3);
    }

    #[tokio::test]
    async fn test_put_search_unknown_session() {
        let backend = MemoryBackend::new();
        let err = backend
            .put_search(99, SearchUpsert::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_fail_next_only_fails_once() {
        let backend = MemoryBackend::new();
        backend.fail_next(BackendOp::ListResults);

        let err = backend.list_results(1, Page::default()).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(backend.list_results(1, Page::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_pagination_window() {
        let backend = MemoryBackend::new();
        for i in 0..5 {
            backend.seed_session(&format!("s{}", i));
        }
        let page = backend
            .list_sessions(Page { offset: 1, limit: 2 })
            .await
            .unwrap();
        let names: Vec<_> = page.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["s3", "s2"]);
    }
}
