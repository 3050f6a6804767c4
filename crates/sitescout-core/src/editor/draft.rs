use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{IssueKind, SearchConfiguration, SearchUpsert};

/// Message shown when the query is blank
pub const QUERY_REQUIRED: &str = "Please enter a search query.";
/// Message shown when max results is not positive
pub const MAX_RESULTS_POSITIVE: &str = "Max results must be greater than 0.";
/// Message shown when no issue kind is selected
pub const ISSUES_REQUIRED: &str = "Select at least one issue to check.";

/// User-editable, unsaved search configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub query: String,
    pub issues: BTreeSet<IssueKind>,
    pub max_results: i64,
}

impl From<&SearchConfiguration> for Draft {
    fn from(config: &SearchConfiguration) -> Self {
        Self {
            query: config.query.clone(),
            issues: config.issues.clone(),
            max_results: config.max_results_requested,
        }
    }
}

impl Draft {
    /// Request body persisting this draft
    pub fn to_upsert(&self) -> SearchUpsert {
        SearchUpsert {
            query: self.query.clone(),
            issues: self.issues.iter().copied().collect(),
            max_results: self.max_results,
        }
    }

    /// Apply one edit in place
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Query(query) => self.query = query,
            DraftEdit::MaxResults(max_results) => self.max_results = max_results,
            DraftEdit::Issues(issues) => self.issues = issues,
            DraftEdit::ToggleIssue(kind) => {
                if !self.issues.remove(&kind) {
                    self.issues.insert(kind);
                }
            }
        }
    }
}

/// Form field of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Query,
    Issues,
    MaxResults,
}

/// A single user edit of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    /// Replace the query text
    Query(String),
    /// Replace the requested result count
    MaxResults(i64),
    /// Replace the whole issue selection
    Issues(BTreeSet<IssueKind>),
    /// Add the kind if absent, remove it if present
    ToggleIssue(IssueKind),
}

impl DraftEdit {
    /// Field this edit touches
    pub fn field(&self) -> DraftField {
        match self {
            DraftEdit::Query(_) => DraftField::Query,
            DraftEdit::MaxResults(_) => DraftField::MaxResults,
            DraftEdit::Issues(_) | DraftEdit::ToggleIssue(_) => DraftField::Issues,
        }
    }
}

/// Per-field validation messages of a draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub query: Option<&'static str>,
    pub issues: Option<&'static str>,
    pub max_results: Option<&'static str>,
}

impl ValidationErrors {
    /// True when the draft passed every rule
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.issues.is_none() && self.max_results.is_none()
    }

    /// Message for `field`, if any
    pub fn get(&self, field: DraftField) -> Option<&'static str> {
        match field {
            DraftField::Query => self.query,
            DraftField::Issues => self.issues,
            DraftField::MaxResults => self.max_results,
        }
    }

    /// Drop the message for `field`
    pub fn clear(&mut self, field: DraftField) {
        match field {
            DraftField::Query => self.query = None,
            DraftField::Issues => self.issues = None,
            DraftField::MaxResults => self.max_results = None,
        }
    }
}

/// Check a draft against every rule. Never short-circuits.
pub fn validate(draft: &Draft) -> ValidationErrors {
    ValidationErrors {
        query: draft.query.trim().is_empty().then_some(QUERY_REQUIRED),
        issues: draft.issues.is_empty().then_some(ISSUES_REQUIRED),
        max_results: (draft.max_results <= 0).then_some(MAX_RESULTS_POSITIVE),
    }
}
