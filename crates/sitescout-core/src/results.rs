//! Result rows of the selected session

use serde::Serialize;
use tracing::debug;

use crate::backend::BackendError;
use crate::models::{Page, ResultRow, SessionId};
use crate::selection::Epoch;

/// Placeholder shown instead of an empty table
pub const NO_RESULTS_PLACEHOLDER: &str = "No results yet.";

/// What the result table shows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsView {
    /// Nothing fetched for the current selection
    #[default]
    NotRequested,
    /// A fetch is outstanding
    Loading,
    /// The last fetch failed; earlier rows are gone
    Error,
    /// Rows of the last successful fetch, possibly empty
    Loaded { rows: Vec<ResultRow> },
}

/// Request for the rows after the ones already loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoreTicket {
    pub epoch: Epoch,
    pub session_id: SessionId,
    pub page: Page,
    fetch: u64,
}

/// Result viewer bound to one selection epoch
#[derive(Debug, Clone, Default)]
pub struct ResultViewer {
    epoch: Epoch,
    view: ResultsView,
    /// Bumped by every full fetch; a follow-up page only extends the fetch it started from
    fetch: u64,
    /// The last page came back full
    has_more: bool,
    loading_more: bool,
}

impl ResultViewer {
    /// Create a viewer with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-bind to a new selection epoch and forget the previous rows
    pub fn reset(&mut self, epoch: Epoch) {
        self.epoch = epoch;
        self.view = ResultsView::NotRequested;
        self.has_more = false;
        self.loading_more = false;
    }

    /// Current display state
    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    /// Session whose results are shown
    pub fn session_id(&self) -> Option<SessionId> {
        self.epoch.session_id()
    }

    /// Whether the backend may hold rows beyond the loaded ones
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    /// Start a fetch under `epoch`.
    ///
    /// Returns the session to fetch, or `None` when `epoch` is stale or
    /// nothing is selected.
    pub fn begin_fetch(&mut self, epoch: Epoch) -> Option<SessionId> {
        if epoch != self.epoch {
            debug!("Not fetching results for stale {:?}", epoch);
            return None;
        }
        let session_id = epoch.session_id()?;
        self.view = ResultsView::Loading;
        self.fetch += 1;
        self.has_more = false;
        self.loading_more = false;
        Some(session_id)
    }

    /// Feed back a fetch of `page` started under `epoch`.
    ///
    /// Returns `false` when the outcome was stale and dropped.
    pub fn apply_fetch(
        &mut self,
        epoch: Epoch,
        page: Page,
        outcome: Result<Vec<ResultRow>, &BackendError>,
    ) -> bool {
        if epoch != self.epoch {
            debug!("Discarding results for {:?} (now {:?})", epoch, self.epoch);
            return false;
        }
        self.view = match outcome {
            Ok(rows) => {
                self.has_more = page.is_filled_by(rows.len());
                ResultsView::Loaded { rows }
            }
            Err(_) => {
                self.has_more = false;
                ResultsView::Error
            }
        };
        true
    }

    /// Start fetching the rows after the loaded ones.
    ///
    /// `None` unless rows are loaded under `epoch`, the last page was full
    /// and no follow-up is already outstanding.
    pub fn begin_more(&mut self, epoch: Epoch, limit: u32) -> Option<MoreTicket> {
        if epoch != self.epoch || !self.has_more || self.loading_more {
            return None;
        }
        let ResultsView::Loaded { rows } = &self.view else {
            return None;
        };
        let offset = u32::try_from(rows.len()).ok()?;
        let session_id = epoch.session_id()?;
        self.loading_more = true;
        Some(MoreTicket {
            epoch,
            session_id,
            page: Page { offset, limit },
            fetch: self.fetch,
        })
    }

    /// Feed back a follow-up page.
    ///
    /// Rows are appended; a failure behaves like a failed fetch. Returns
    /// `false` when the selection or the underlying fetch has moved on.
    pub fn apply_more(
        &mut self,
        ticket: &MoreTicket,
        outcome: Result<Vec<ResultRow>, &BackendError>,
    ) -> bool {
        if ticket.epoch != self.epoch || ticket.fetch != self.fetch || !self.loading_more {
            debug!("Discarding follow-up results for {:?}", ticket.epoch);
            return false;
        }
        self.loading_more = false;
        match outcome {
            Ok(more) => {
                let ResultsView::Loaded { rows } = &mut self.view else {
                    return false;
                };
                let filled = ticket.page.is_filled_by(more.len());
                rows.extend(more);
                self.has_more = filled;
            }
            Err(_) => {
                self.has_more = false;
                self.view = ResultsView::Error;
            }
        }
        true
    }
}
