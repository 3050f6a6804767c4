//! Dismissable, non-fatal user notices

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Oldest notices are dropped beyond this many
const MAX_NOTICES: usize = 5;

/// Operation whose failure raised a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    LoadSessions,
    CreateSession,
    LoadSession,
    SaveSession,
    LoadResults,
}

impl NoticeKind {
    /// User-facing text; never carries transport detail
    pub fn message(&self) -> &'static str {
        match self {
            NoticeKind::LoadSessions => "Could not load sessions.",
            NoticeKind::CreateSession => "Could not create session.",
            NoticeKind::LoadSession => "Could not load session.",
            NoticeKind::SaveSession => "Could not save session.",
            NoticeKind::LoadResults => "Could not load results.",
        }
    }
}

/// A raised notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: &'static str,
    pub raised_at: DateTime<Utc>,
}

/// Notices waiting to be dismissed, oldest first
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a notice, returning its id
    pub fn raise(&mut self, kind: NoticeKind) -> u64 {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            kind,
            message: kind.message(),
            raised_at: Utc::now(),
        });
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
        self.next_id
    }

    /// Dismiss a notice; `false` if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Dismiss everything
    pub fn clear(&mut self) {
        self.notices.clear();
    }

    /// Newest notice
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// All notices, oldest first
    pub fn all(&self) -> &[Notice] {
        &self.notices
    }
}
