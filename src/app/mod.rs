//! Application State
//!
//! Core application logic tying together the remote store, the catalog
//! components, UI and input.

mod actions;
mod config;
mod games;
mod input;
mod session;

use std::sync::Arc;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::auth::{LoginControl, User};
use crate::catalog::{GameId, Refetch, RowEditor};
use crate::input::modes::{InputMode, ModeState};
use crate::remote::RemoteStore;
use crate::router::{Navigate, Route, Router};
use crate::tasks::{Job, TaskKey, TaskOutcome, TaskResult, TaskRunner};
use crate::ui::components::{HelpState, ListViewState, MessageType};
use crate::ui::{Renderer, UiState};

pub use config::{AppConfig, ConfigError, Overrides, PendingAction};

/// Requests raised by component callbacks, answered on the next tick.
#[derive(Debug)]
enum Signal {
    Refetch,
    Navigate(Route),
}

pub struct App {
    pub config: AppConfig,
    tasks: TaskRunner,
    outcomes: mpsc::UnboundedReceiver<TaskOutcome>,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signals: mpsc::UnboundedReceiver<Signal>,
    pub router: Router,
    pub mode_state: ModeState,
    pub terminal_size: Rect,
    pub list_state: ListViewState,
    pub editors: Vec<RowEditor>,
    pub editing: Option<GameId>,
    pub login: LoginControl,
    pub user: Option<User>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub message: Option<(String, MessageType, Instant)>,
    pub pending_action: Option<PendingAction>,
    pub should_quit: bool,
    pub help_state: HelpState,
}

impl App {
    pub fn new(config: AppConfig, store: Arc<dyn RemoteStore>) -> Self {
        let (tasks, outcomes) = TaskRunner::new(store, config.request_timeout());
        let (signal_tx, signals) = mpsc::unbounded_channel();
        let login = LoginControl::new(navigate_callback(&signal_tx));

        Self {
            config,
            tasks,
            outcomes,
            signal_tx,
            signals,
            router: Router::new(),
            mode_state: ModeState::new(),
            terminal_size: Rect::default(),
            list_state: ListViewState::new(),
            editors: Vec::new(),
            editing: None,
            login,
            user: None,
            loading: false,
            load_error: None,
            message: None,
            pending_action: None,
            should_quit: false,
            help_state: HelpState::new(),
        }
    }

    /// Issues the initial listing. Must be called from within the runtime.
    pub fn start(&mut self) {
        self.load_games();
    }

    /// Applies finished remote calls and component signals.
    pub fn process_events(&mut self) {
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.handle_outcome(outcome);
        }
        while let Ok(signal) = self.signals.try_recv() {
            self.handle_signal(signal);
        }
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        if !self.tasks.settle(&outcome) {
            debug!(id = %outcome.id, key = %outcome.key, "ignoring stale outcome");
            return;
        }

        match (outcome.key, outcome.result) {
            (_, TaskResult::Listed(result)) => self.finish_listing(result),
            (TaskKey::Game(id), TaskResult::Deleted(result)) => match self.editor_mut(&id) {
                Some(editor) => editor.finish_delete(result),
                None => debug!(%id, "delete finished for a game no longer listed"),
            },
            (TaskKey::Game(id), TaskResult::Updated(result)) => match self.editor_mut(&id) {
                Some(editor) => editor.finish_update(result),
                None => debug!(%id, "update finished for a game no longer listed"),
            },
            (_, TaskResult::SignedIn(result)) => self.finish_sign_in(result),
            (key, result) => warn!(%key, ?result, "outcome does not match its task key"),
        }
    }

    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Refetch => self.load_games(),
            Signal::Navigate(route) => self.navigate(route),
        }
    }

    /// Hands a component's job to the runner. A refused job is reported
    /// and the caller must drop its in-flight mark.
    fn dispatch(&mut self, job: Job) -> bool {
        match self.tasks.spawn(job) {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "remote call refused");
                self.set_message(&e.to_string(), MessageType::Warning);
                false
            }
        }
    }

    fn refetch_callback(&self) -> Refetch {
        let tx = self.signal_tx.clone();
        Arc::new(move || {
            let _ = tx.send(Signal::Refetch);
        })
    }

    pub fn navigate(&mut self, route: Route) {
        if &route != self.router.current() {
            debug!(path = %route.path(), "navigate");
            self.router.navigate(route);
        }
        self.route_changed();
    }

    pub fn go_back(&mut self) {
        if self.router.current() == &Route::Root {
            return;
        }
        self.router.back();
        self.route_changed();
    }

    /// Remounts the per-page components and syncs the list selection.
    fn route_changed(&mut self) {
        if self.login.close() {
            self.tasks.cancel(&TaskKey::Login);
        }
        self.login = LoginControl::new(navigate_callback(&self.signal_tx));
        if self.mode_state.mode == InputMode::Login {
            self.mode_state.to_normal();
        }
        self.sync_selection();
    }

    pub fn editor(&self, id: &GameId) -> Option<&RowEditor> {
        self.editors.iter().find(|e| &e.game().id == id)
    }

    fn editor_mut(&mut self, id: &GameId) -> Option<&mut RowEditor> {
        self.editors.iter_mut().find(|e| &e.game().id == id)
    }

    pub fn selected_editor(&self) -> Option<&RowEditor> {
        self.list_state.selected().and_then(|i| self.editors.get(i))
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.terminal_size = frame.area();
        self.check_message_expiry();

        let message = self.message.as_ref().map(|(m, t, _)| (m.as_str(), *t));
        let command_buffer = self.mode_state.mode.is_text_input().then(|| self.mode_state.get_buffer());
        let confirm_message = self.pending_action.as_ref().map(|a| a.confirm_message());
        let editing = self
            .editing
            .as_ref()
            .and_then(|id| self.editors.iter().find(|e| &e.game().id == id));
        let user = self.user.as_ref().map(|u| u.email.as_deref().unwrap_or(u.id.as_str()));

        let mut state = UiState {
            route: self.router.current(),
            mode: self.mode_state.mode,
            rows: &self.editors,
            list_state: &mut self.list_state,
            loading: self.loading,
            load_error: self.load_error.as_deref(),
            command_buffer,
            message,
            confirm_message,
            editing,
            login: &self.login,
            user,
            help_state: &self.help_state,
        };

        Renderer::render(frame, &mut state);
    }

    fn check_message_expiry(&mut self) {
        let timeout = self.config.message_timeout();
        let expired = self
            .message
            .as_ref()
            .is_some_and(|(_, _, time)| time.elapsed() > timeout);

        if expired {
            self.message = None;
        }
    }

    pub fn set_message(&mut self, msg: &str, msg_type: MessageType) {
        self.message = Some((msg.to_string(), msg_type, Instant::now()));
    }

    pub fn shutdown(&mut self) {
        debug!("cancelling outstanding remote calls");
        self.tasks.shutdown();
    }
}

fn navigate_callback(tx: &mpsc::UnboundedSender<Signal>) -> Navigate {
    let tx = tx.clone();
    Arc::new(move |route| {
        let _ = tx.send(Signal::Navigate(route));
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::catalog::Game;
    use crate::remote::testing::FakeStore;

    pub fn games() -> Vec<Game> {
        vec![
            Game::new("1", "Doom", "http://x/doom.png"),
            Game::new("7", "Quake", "http://x/quake.png"),
            Game::new("42", "Hexen", "http://x/hexen.png"),
        ]
    }

    pub fn app_with(store: Arc<FakeStore>) -> App {
        App::new(AppConfig::default(), store)
    }

    /// Waits for the next outcome, applies it and answers the signals it raised.
    pub async fn settle_next(app: &mut App) {
        let outcome = tokio::time::timeout(Duration::from_secs(5), app.outcomes.recv())
            .await
            .expect("outcome in time")
            .expect("channel open");
        app.handle_outcome(outcome);
        app.process_events();
    }

    pub async fn loaded(store: Arc<FakeStore>) -> App {
        let mut app = app_with(store);
        app.start();
        settle_next(&mut app).await;
        app
    }

    pub fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::*;
    use super::*;
    use crate::catalog::Game;
    use crate::remote::testing::FakeStore;

    #[tokio::test]
    async fn test_start_loads_listing() {
        let store = Arc::new(FakeStore::with_games(games()));
        let app = loaded(store.clone()).await;

        assert!(!app.loading);
        assert_eq!(app.editors.len(), 3);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_stale_listing_is_ignored() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = app_with(store.clone());
        app.load_games();
        app.load_games();

        while app.tasks.is_in_flight(&TaskKey::Listing) {
            settle_next(&mut app).await;
        }
        assert_eq!(app.editors.len(), 3);
        assert!(!app.tasks.is_in_flight(&TaskKey::Listing));
    }

    #[tokio::test]
    async fn test_navigation_remounts_login() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store).await;
        app.login.open();
        app.mode_state.to_login();

        app.navigate(Route::Game(GameId::new("7")));
        assert!(!app.login.is_open());
        assert_eq!(app.mode_state.mode, InputMode::Normal);
        assert_eq!(app.list_state.selected(), Some(1));

        app.go_back();
        assert_eq!(app.router.current(), &Route::Root);
    }

    #[tokio::test]
    async fn test_refetch_signal_reloads() {
        let store = Arc::new(FakeStore::with_games(vec![Game::new("1", "Doom", "http://x")]));
        let mut app = loaded(store.clone()).await;

        (app.refetch_callback())();
        app.process_events();
        settle_next(&mut app).await;
        assert_eq!(store.calls(), vec!["list", "list"]);
    }

    #[tokio::test]
    async fn test_overlays_render_on_short_terminals() {
        use crossterm::event::KeyCode;
        use ratatui::{Terminal, backend::TestBackend};

        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store).await;

        for height in [1, 3, 5, 8, 10, 24] {
            let mut terminal = Terminal::new(TestBackend::new(80, height)).unwrap();
            terminal.draw(|frame| app.render(frame)).unwrap();

            for key in ['e', 'a', 'x', '?'] {
                press(&mut app, KeyCode::Char(key));
                assert_ne!(app.mode_state.mode, InputMode::Normal);
                terminal.draw(|frame| app.render(frame)).unwrap();
                press(&mut app, KeyCode::Esc);
                assert_eq!(app.mode_state.mode, InputMode::Normal);
            }
        }
    }
}
