//! Demo mode: an in-memory backend seeded with sample sessions

mod scenario;

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use sitescout_core::backend::MemoryBackend;
use sitescout_core::models::{ResultRow, SearchConfiguration};

pub use scenario::{default_sessions, DemoResult, DemoSearch, DemoSession};

/// Simulated round-trip time, long enough to see loading states
const DEMO_LATENCY: Duration = Duration::from_millis(400);

/// Build the demo backend
pub fn seeded_backend() -> MemoryBackend {
    seed(MemoryBackend::new().with_latency(DEMO_LATENCY), default_sessions())
}

/// Load `sessions` into `backend`
pub fn seed(backend: MemoryBackend, sessions: Vec<DemoSession>) -> MemoryBackend {
    let mut next_row_id = 0;
    for demo in sessions {
        let session = backend.seed_session(demo.name);
        if let Some(search) = demo.search {
            backend.seed_search(SearchConfiguration {
                session_id: session.id,
                query: search.query.to_string(),
                issues: search.issues.iter().copied().collect(),
                max_results_requested: search.max_results,
                checked_websites_count: search.checked,
                last_search_cursor: (!search.completed).then(|| format!("page-{}", search.checked)),
                is_completed: search.completed,
            });
        }

        let rows = demo
            .results
            .into_iter()
            .enumerate()
            .map(|(offset, result)| {
                next_row_id += 1;
                ResultRow {
                    id: next_row_id,
                    created_at: Utc::now() - ChronoDuration::minutes(offset as i64),
                    session_id: session.id,
                    url: format!("https://{}/", result.domain),
                    domain: result.domain.to_string(),
                    page_count: result.page_count,
                    tier: result.tier,
                    issues_detected: result.issues.iter().copied().collect::<BTreeSet<_>>(),
                    lighthouse_json: None,
                    contact_email: result.contact_email.map(str::to_string),
                    status: result.status.to_string(),
                }
            })
            .collect();
        backend.seed_results(session.id, rows);
    }
    backend
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescout_core::backend::SessionBackend;
    use sitescout_core::models::Page;

    #[tokio::test]
    async fn test_seeded_backend_lists_newest_first() {
        let backend = seed(MemoryBackend::new(), default_sessions());

        let sessions = backend.list_sessions(Page::default()).await.unwrap();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].display_label(), "Untitled");
        assert!(!sessions[0].is_configured);
        assert!(sessions[2].is_completed);

        let rows = backend.list_results(sessions[2].id, Page::default()).await.unwrap();
        assert_eq!(rows.len(), 3);
    }
}
