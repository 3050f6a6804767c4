//! View-local state and per-frame snapshots.
//!
//! [`UiState`] holds what only the terminal front-end cares about (focus,
//! cursors, popups). [`Snapshot`] is captured from the core once per frame so
//! rendering and key resolution never touch a lock.

use chrono::{DateTime, Utc};
use sitescout_core::api::{EditorSnapshot, ResultsSnapshot, ScoutCore};
use sitescout_core::backend::SessionBackend;
use sitescout_core::models::{IssueKind, Session, SessionId};
use sitescout_core::notice::Notice;
use sitescout_core::selection::SelectionReader;

/// Spinner frames shown while a request is outstanding
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Panel receiving key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sessions,
    Form,
    Results,
}

impl Focus {
    /// Cycle Sessions -> Form -> Results -> Sessions
    pub fn next(self) -> Self {
        match self {
            Focus::Sessions => Focus::Form,
            Focus::Form => Focus::Results,
            Focus::Results => Focus::Sessions,
        }
    }

    /// Short name for the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            Focus::Sessions => "Sessions",
            Focus::Form => "Search",
            Focus::Results => "Results",
        }
    }
}

/// Field of the search form under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Query,
    MaxResults,
    /// Index into [`IssueKind::all_variants`]
    Issue(usize),
}

impl FormField {
    pub fn next(self) -> Self {
        let last = IssueKind::all_variants().len() - 1;
        match self {
            FormField::Query => FormField::MaxResults,
            FormField::MaxResults => FormField::Issue(0),
            FormField::Issue(i) if i < last => FormField::Issue(i + 1),
            FormField::Issue(_) => FormField::Query,
        }
    }

    pub fn previous(self) -> Self {
        let last = IssueKind::all_variants().len() - 1;
        match self {
            FormField::Query => FormField::Issue(last),
            FormField::MaxResults => FormField::Query,
            FormField::Issue(0) => FormField::MaxResults,
            FormField::Issue(i) => FormField::Issue(i - 1),
        }
    }

    /// Issue kind under the cursor, if on the issue list
    pub fn issue(&self) -> Option<IssueKind> {
        match self {
            FormField::Issue(i) => IssueKind::all_variants().get(*i).copied(),
            _ => None,
        }
    }
}

/// Front-end state that never leaves the terminal
#[derive(Debug)]
pub struct UiState {
    pub running: bool,
    pub show_help: bool,
    pub focus: Focus,
    /// Highlighted row of the session list
    pub list_cursor: usize,
    pub form_field: FormField,
    /// Cursor position in the query, in characters
    pub query_cursor: usize,
    /// First visible result row
    pub results_offset: usize,
    spinner_frame: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            running: true,
            show_help: false,
            focus: Focus::default(),
            list_cursor: 0,
            form_field: FormField::default(),
            query_cursor: 0,
            results_offset: 0,
            spinner_frame: 0,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Whether keys are typed into a text field rather than interpreted
    pub fn is_typing(&self) -> bool {
        self.focus == Focus::Form && self.form_field == FormField::Query
    }

    /// Move the list cursor, clamped to `len`
    pub fn move_list_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.list_cursor = 0;
            return;
        }
        let target = self.list_cursor as isize + delta;
        self.list_cursor = target.clamp(0, len as isize - 1) as usize;
    }

    /// Point the list cursor at `session_id` if it is listed
    pub fn focus_session(&mut self, sessions: &[Session], session_id: SessionId) {
        if let Some(index) = sessions.iter().position(|s| s.id == session_id) {
            self.list_cursor = index;
        }
    }

    /// Forget form and result cursors after the selection changed
    pub fn reset_session_view(&mut self, query_len: usize) {
        self.form_field = FormField::Query;
        self.query_cursor = query_len;
        self.results_offset = 0;
    }
}

/// Everything the UI shows, captured from the core in one go
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub sessions: Vec<Session>,
    pub sessions_loading: bool,
    /// Older sessions exist beyond the fetched page
    pub sessions_truncated: bool,
    pub creating: bool,
    pub selected: Option<SessionId>,
    pub editor: EditorSnapshot,
    pub results: ResultsSnapshot,
    /// Newest pending notice
    pub notice: Option<Notice>,
    pub notice_count: usize,
    pub last_sync: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn capture<B: SessionBackend>(core: &ScoutCore<B>, selection: &SelectionReader) -> Self {
        Self {
            sessions: core.list_sessions(),
            sessions_loading: core.sessions_loading(),
            sessions_truncated: core.sessions_truncated(),
            creating: core.is_creating(),
            selected: selection.selected(),
            editor: core.editor(),
            results: core.results(),
            notice: core.latest_notice(),
            notice_count: core.notices().len(),
            last_sync: core.last_sync(),
        }
    }

    /// Session under the list cursor
    pub fn session_at(&self, index: usize) -> Option<&Session> {
        self.sessions.get(index)
    }

    /// Current query text, empty when no draft is loaded
    pub fn query(&self) -> &str {
        self.editor
            .draft
            .as_ref()
            .map(|d| d.query.as_str())
            .unwrap_or("")
    }
}
