use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Backend identifier of a session
pub type SessionId = i64;

/// Kind of page problem a search can look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Generic SEO issues
    SeoIssues,
    /// Page has no `<title>`
    MissingTitle,
    /// Page has no meta description
    MissingMetaDescription,
    /// Page has no `<h1>`
    MissingH1,
    /// Page performs poorly
    SlowPerformance,
}

impl IssueKind {
    /// All issue kinds in display order
    pub fn all_variants() -> [IssueKind; 5] {
        [
            IssueKind::SeoIssues,
            IssueKind::MissingTitle,
            IssueKind::MissingMetaDescription,
            IssueKind::MissingH1,
            IssueKind::SlowPerformance,
        ]
    }

    /// Wire value used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SeoIssues => "seo-issues",
            IssueKind::MissingTitle => "missing-title",
            IssueKind::MissingMetaDescription => "missing-meta-description",
            IssueKind::MissingH1 => "missing-h1",
            IssueKind::SlowPerformance => "slow-performance",
        }
    }

    /// Human readable label for pickers
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::SeoIssues => "SEO issues",
            IssueKind::MissingTitle => "Missing title",
            IssueKind::MissingMetaDescription => "Missing meta description",
            IssueKind::MissingH1 => "Missing H1",
            IssueKind::SlowPerformance => "Slow performance",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire value is not a known issue kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown issue kind: {0}")]
pub struct UnknownIssueKind(pub String);

impl FromStr for IssueKind {
    type Err = UnknownIssueKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueKind::all_variants()
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownIssueKind(s.to_string()))
    }
}

/// Deserialize a list of issue kinds, dropping values this client does not know.
///
/// The server may grow the enumeration before clients are updated; an unknown
/// kind must never make a whole response unreadable.
fn deserialize_known_issues<'de, D>(deserializer: D) -> Result<BTreeSet<IssueKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match value.parse::<IssueKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                warn!("Ignoring {}", err);
                None
            }
        })
        .collect())
}

/// Tiers arrive as JSON numbers that may carry a fractional part
fn deserialize_tier<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round() as i64)
}

/// A saved search session as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend identifier
    pub id: SessionId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Display name reported by the backend
    #[serde(default)]
    pub name: String,
    /// Whether a search configuration exists for this session
    #[serde(default)]
    pub is_configured: bool,
    /// Whether the backend finished producing results
    #[serde(default)]
    pub is_completed: bool,
    /// Saved query, once the client has seen this session's configuration
    #[serde(skip)]
    pub query: Option<String>,
}

impl Session {
    /// Label shown in the session picker: the saved query, else the
    /// backend name, else "Untitled"
    pub fn display_label(&self) -> &str {
        [self.query.as_deref().unwrap_or(""), self.name.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|label| !label.is_empty())
            .unwrap_or("Untitled")
    }
}

/// Search configuration of one session, as persisted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfiguration {
    /// Owning session
    pub session_id: SessionId,
    /// Free-text search query
    pub query: String,
    /// Issue kinds to check for
    #[serde(default, deserialize_with = "deserialize_known_issues")]
    pub issues: BTreeSet<IssueKind>,
    /// Number of results requested
    pub max_results_requested: i64,
    /// Websites the backend already checked
    #[serde(default)]
    pub checked_websites_count: i64,
    /// Server-side progress cursor
    #[serde(default)]
    pub last_search_cursor: Option<String>,
    /// Whether the backend finished this search
    #[serde(default)]
    pub is_completed: bool,
}

/// Request body for creating a session or saving its search configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchUpsert {
    pub query: String,
    pub issues: Vec<IssueKind>,
    pub max_results: i64,
}

/// One website produced by a session's search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub session_id: SessionId,
    pub url: String,
    pub domain: String,
    #[serde(default)]
    pub page_count: i64,
    /// Tier classification
    #[serde(deserialize_with = "deserialize_tier")]
    pub tier: i64,
    #[serde(default, deserialize_with = "deserialize_known_issues")]
    pub issues_detected: BTreeSet<IssueKind>,
    /// Raw Lighthouse report, if collected
    #[serde(default)]
    pub lighthouse_json: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Status label, rendered verbatim
    pub status: String,
}

impl ResultRow {
    /// Detected issues joined for table display
    pub fn issues_text(&self) -> String {
        self.issues_detected
            .iter()
            .map(IssueKind::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Offset/limit window for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// First page with the given size
    pub fn first(limit: u32) -> Self {
        Self { offset: 0, limit }
    }

    /// Whether a response of `len` items used the whole window
    pub fn is_filled_by(&self, len: usize) -> bool {
        self.limit > 0 && len >= self.limit as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_issue_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&IssueKind::MissingMetaDescription).unwrap(),
            "\"missing-meta-description\""
        );
        assert_eq!("missing-h1".parse::<IssueKind>(), Ok(IssueKind::MissingH1));
        assert!("broken-links".parse::<IssueKind>().is_err());
    }

    #[test]
    fn test_search_configuration_drops_unknown_issues() {
        let json = r#"{
            "session_id": 3,
            "query": "site:example.com",
            "issues": ["missing-title", "broken-links", "slow-performance"],
            "max_results_requested": 10,
            "checked_websites_count": 4,
            "last_search_cursor": null,
            "is_completed": false
        }"#;

        let config: SearchConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.issues,
            BTreeSet::from([IssueKind::MissingTitle, IssueKind::SlowPerformance])
        );
        assert_eq!(config.checked_websites_count, 4);
    }

    #[test]
    fn test_result_row_accepts_float_tier() {
        let json = r#"{
            "id": 7,
            "created_at": "2024-05-01T12:00:00Z",
            "session_id": 3,
            "url": "https://example.com/",
            "domain": "example.com",
            "page_count": 12,
            "tier": 2.0,
            "issues_detected": ["missing-h1", "missing-title"],
            "lighthouse_json": null,
            "contact_email": "owner@example.com",
            "status": "completed"
        }"#;

        let row: ResultRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.tier, 2);
        assert_eq!(row.issues_text(), "missing-title, missing-h1");
        assert_eq!(row.contact_email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_session_display_label() {
        let mut session = Session {
            id: 1,
            created_at: Utc::now(),
            name: "  ".to_string(),
            is_configured: false,
            is_completed: false,
            query: None,
        };
        assert_eq!(session.display_label(), "Untitled");

        session.name = " plumbers in leeds ".to_string();
        assert_eq!(session.display_label(), "plumbers in leeds");

        session.query = Some("roofers near york".to_string());
        assert_eq!(session.display_label(), "roofers near york");

        session.query = Some(" ".to_string());
        assert_eq!(session.display_label(), "plumbers in leeds");
    }

    #[test]
    fn test_upsert_body_shape() {
        let body = SearchUpsert::default();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"query": "", "issues": [], "max_results": 0})
        );
    }
}
