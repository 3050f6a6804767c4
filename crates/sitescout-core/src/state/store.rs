use parking_lot::RwLock;
use std::sync::Arc;

use crate::directory::SessionDirectory;
use crate::editor::SessionEditor;
use crate::notice::NoticeBoard;
use crate::results::ResultViewer;

/// Shared state type alias
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state
///
/// The editor and result viewer are always bound to the same selection
/// epoch; both are reset together whenever the selection changes.
#[derive(Debug, Default)]
pub struct AppState {
    /// Known sessions
    pub directory: SessionDirectory,
    /// Search configuration editor of the selected session
    pub editor: SessionEditor,
    /// Result rows of the selected session
    pub results: ResultViewer,
    /// Pending user notices
    pub notices: NoticeBoard,
    /// When the session list last loaded successfully
    pub last_sync: Option<chrono::DateTime<chrono::Utc>>,
}

impl AppState {
    /// Create a new application state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared state
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorPhase;
    use crate::results::ResultsView;

    #[test]
    fn test_new_state_is_idle() {
        let state = AppState::shared();
        let state = state.read();
        assert!(state.directory.sessions().is_empty());
        assert_eq!(state.editor.phase(), EditorPhase::Idle);
        assert_eq!(state.results.view(), &ResultsView::NotRequested);
        assert!(state.notices.latest().is_none());
        assert!(state.last_sync.is_none());
    }
}
