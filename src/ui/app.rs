use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use sitescout_core::api::{ApiError, CoreEvent, ScoutCore};
use sitescout_core::backend::SessionBackend;
use sitescout_core::models::SessionId;
use sitescout_core::selection::SelectionReader;

use super::components::{HelpPopup, NoticeBanner, ResultsTable, SearchForm, SessionList, StatusBar};
use super::key_handler::{self, KeyAction};
use super::view::{Snapshot, UiState};
use super::Layout;

/// Main application
pub struct App<B> {
    core: Arc<ScoutCore<B>>,
    ui: UiState,
    layout: Layout,
}

impl<B: SessionBackend> App<B> {
    /// Create a new application
    pub fn new(core: ScoutCore<B>) -> Self {
        Self {
            core: Arc::new(core),
            ui: UiState::new(),
            layout: Layout::new(),
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.spawn("refresh sessions", |core| async move { core.refresh_sessions().await });

        // Main loop
        let result = self.main_loop(&mut terminal).await;

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        let mut core_rx = self.core.subscribe();
        let mut selection = self.core.selection();
        let mut tick = tokio::time::interval(Duration::from_millis(
            self.core.settings().ui.tick_rate_ms,
        ));

        while self.ui.running {
            let snapshot = Snapshot::capture(&self.core, &selection);
            terminal.draw(|frame| self.draw(frame, &snapshot))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let action =
                            key_handler::resolve_key(&mut self.ui, &snapshot, key.code, key.modifiers);
                        self.execute(action, &snapshot);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                event = core_rx.recv() => match event {
                    Ok(event) => self.on_core_event(event),
                    Err(RecvError::Lagged(skipped)) => debug!("UI lagged {} core events", skipped),
                    Err(RecvError::Closed) => break,
                },
                Some(epoch) = selection.changed() => self.on_selection_changed(&selection, epoch.session_id()),
                _ = tick.tick() => self.ui.tick_spinner(),
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let areas = self.layout.calculate(frame.area(), snapshot.notice.is_some());

        if let (Some(area), Some(notice)) = (areas.notice, snapshot.notice.as_ref()) {
            NoticeBanner::render(frame, area, notice, snapshot.notice_count);
        }
        SessionList::render(frame, areas.session_list, snapshot, &self.ui);
        SearchForm::render(frame, areas.form, snapshot, &self.ui);
        ResultsTable::render(frame, areas.results, snapshot, &self.ui);
        StatusBar::render(
            frame,
            areas.status_bar,
            snapshot,
            &self.ui,
            self.core.settings().ui.show_help_hint,
        );

        if self.ui.show_help {
            let popup_area = self.layout.popup_area(frame.area(), 60, 80);
            HelpPopup::render(frame, popup_area);
        }
    }

    /// Hand a resolved key action to the core
    fn execute(&mut self, action: KeyAction, snapshot: &Snapshot) {
        match action {
            KeyAction::None => {}
            KeyAction::Quit => self.ui.quit(),
            KeyAction::RefreshSessions => {
                self.spawn("refresh sessions", |core| async move { core.refresh_sessions().await });
            }
            KeyAction::CreateSession => {
                self.spawn("create session", |core| async move { core.create_session().await });
            }
            KeyAction::Select(session_id) => {
                if snapshot.selected == session_id {
                    return;
                }
                self.spawn("select session", move |core| async move {
                    core.select_and_load(session_id).await
                });
            }
            KeyAction::Edit(edit) => {
                if let Err(err) = self.core.edit_draft(edit) {
                    debug!("Edit refused: {}", err);
                }
            }
            KeyAction::Submit => {
                self.spawn("save search", |core| async move { core.submit().await });
            }
            KeyAction::RefreshResults => {
                self.spawn("refresh results", |core| async move { core.refresh_results().await });
            }
            KeyAction::LoadMoreResults => {
                self.spawn("load more results", |core| async move {
                    core.load_more_results().await
                });
            }
            KeyAction::DismissNotice(id) => {
                self.core.dismiss_notice(id);
            }
            KeyAction::ClearNotices => self.core.clear_notices(),
        }
    }

    fn on_core_event(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::SessionCreated { session_id } => {
                let sessions = self.core.list_sessions();
                self.ui.focus_session(&sessions, session_id);
            }
            CoreEvent::EditorUpdated { phase } => {
                let len = self
                    .core
                    .editor()
                    .draft
                    .map_or(0, |draft| draft.query.chars().count());
                // Freshly loaded or saved drafts put the cursor at the end
                self.ui.query_cursor = if phase.is_editable() && !self.ui.is_typing() {
                    len
                } else {
                    self.ui.query_cursor.min(len)
                };
            }
            CoreEvent::SessionsUpdated
            | CoreEvent::SelectionChanged { .. }
            | CoreEvent::ResultsUpdated { .. }
            | CoreEvent::NoticeRaised { .. } => {}
        }
    }

    /// The selection moved; forget cursors that belonged to the old session
    fn on_selection_changed(&mut self, selection: &SelectionReader, session_id: Option<SessionId>) {
        if selection.selected() != session_id {
            // A newer change is already queued
            return;
        }
        debug!("View follows selection {:?}", session_id);
        self.ui.reset_session_view(0);
        if let Some(id) = session_id {
            let sessions = self.core.list_sessions();
            self.ui.focus_session(&sessions, id);
        }
    }

    /// Run a core operation in the background; failures are already turned
    /// into notices or inline errors by the core
    fn spawn<T, F, Fut>(&self, what: &'static str, op: F)
    where
        T: Send + 'static,
        F: FnOnce(Arc<ScoutCore<B>>) -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let task = op(self.core.clone());
        tokio::spawn(async move {
            match task.await {
                Ok(_) => {}
                Err(ApiError::Backend(err)) => warn!("{} failed: {}", what, err),
                Err(err) => debug!("{} rejected: {}", what, err),
            }
        });
    }
}
