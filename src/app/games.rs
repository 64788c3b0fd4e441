use std::collections::HashMap;

use tracing::{debug, error, info};

use crate::catalog::{Game, GameId, RowEditor};
use crate::input::modes::InputMode;
use crate::remote::{RemoteError, RemoteResult};
use crate::router::Route;
use crate::tasks::{Job, TaskKey};
use crate::ui::components::MessageType;

use super::App;
use super::config::PendingAction;

impl App {
    pub fn load_games(&mut self) {
        self.loading = true;
        self.dispatch(Job::ListGames);
    }

    pub(super) fn finish_listing(&mut self, result: RemoteResult<Vec<Game>>) {
        self.loading = false;
        match result {
            Ok(games) => {
                info!(count = games.len(), "listing loaded");
                self.load_error = None;
                self.apply_listing(games);
            }
            Err(RemoteError::Cancelled) => debug!("listing cancelled"),
            Err(e) => {
                error!(error = %e, "failed to load games");
                self.set_message(&format!("Failed to load games: {}", e), MessageType::Error);
                self.load_error = Some(e.to_string());
            }
        }
    }

    /// Reconciles the editors with a fresh listing: editors are kept per
    /// identifier, created for new records and dropped for vanished ones.
    fn apply_listing(&mut self, games: Vec<Game>) {
        let shown = match self.router.current() {
            Route::Game(id) => self.editor(id).map(|e| e.game().id.clone()),
            Route::Root => None,
        };

        let mut previous: HashMap<GameId, RowEditor> = self
            .editors
            .drain(..)
            .map(|editor| (editor.game().id.clone(), editor))
            .collect();

        let mut editors = Vec::with_capacity(games.len());
        for game in games {
            let editor = match previous.remove(&game.id) {
                Some(mut editor) => {
                    editor.set_game(game);
                    editor
                }
                None => RowEditor::new(game, self.refetch_callback())
                    .surface_delete_errors(self.config.surface_delete_errors),
            };
            editors.push(editor);
        }
        self.editors = editors;

        for (id, editor) in previous {
            debug!(%id, "game no longer listed");
            if editor.is_busy() {
                self.tasks.cancel(&TaskKey::Game(id));
            }
        }

        if let Some(id) = self.editing.clone() {
            if self.editor(&id).is_none() {
                self.editing = None;
                if self.mode_state.mode == InputMode::Edit {
                    self.mode_state.to_normal();
                }
            }
        }
        let orphaned = matches!(
            &self.pending_action,
            Some(PendingAction::DeleteGame(id)) if self.editor(id).is_none()
        );
        if orphaned {
            self.pending_action = None;
            self.mode_state.to_normal();
        }

        self.list_state.set_total(self.editors.len());
        match shown {
            Some(id) if self.editor(&id).is_none() => self.navigate(Route::Root),
            _ => self.sync_selection(),
        }
    }

    /// Selects the row of the open game page.
    pub(super) fn sync_selection(&mut self) {
        if let Route::Game(id) = self.router.current() {
            if let Some(index) = self.editors.iter().position(|e| &e.game().id == id) {
                self.list_state.select(Some(index));
            }
        }
    }

    /// The record actions apply to: the open game page, else the selected row.
    pub(super) fn target_game(&self) -> Option<GameId> {
        match self.router.current() {
            Route::Game(id) => self.editor(id).map(|e| e.game().id.clone()),
            Route::Root => self.selected_editor().map(|e| e.game().id.clone()),
        }
    }

    pub(super) fn open_game(&mut self) {
        if let Some(editor) = self.selected_editor() {
            let route = Route::Game(editor.game().id.clone());
            self.navigate(route);
        }
    }

    pub(super) fn open_edit(&mut self) {
        let Some(id) = self.target_game() else { return };
        if let Some(editor) = self.editor_mut(&id) {
            editor.open_edit();
            self.editing = Some(id);
            self.mode_state.to_edit();
        }
    }

    pub(super) fn close_edit(&mut self) {
        if let Some(id) = self.editing.take() {
            if let Some(editor) = self.editor_mut(&id) {
                editor.close_edit();
            }
        }
        self.mode_state.to_normal();
    }

    pub(super) fn submit_edit(&mut self) {
        let Some(id) = self.editing.clone() else { return };
        let Some(job) = self.editor_mut(&id).and_then(RowEditor::submit_edit) else { return };
        if !self.dispatch(job) {
            if let Some(editor) = self.editor_mut(&id) {
                editor.abandon_pending();
            }
        }
    }

    pub(super) fn request_delete(&mut self) {
        let Some(id) = self.target_game() else { return };
        let Some(editor) = self.editor_mut(&id) else { return };

        if editor.request_delete() {
            self.pending_action = Some(PendingAction::DeleteGame(id));
            self.mode_state.to_confirm();
        } else {
            self.set_message(&format!("A request for game {} is already in flight", id), MessageType::Warning);
        }
    }

    pub(super) fn confirm_delete(&mut self, id: &GameId) {
        let Some(job) = self.editor_mut(id).and_then(RowEditor::confirm_delete) else { return };
        if !self.dispatch(job) {
            if let Some(editor) = self.editor_mut(id) {
                editor.abandon_pending();
            }
        }
    }

    pub(super) fn cancel_delete(&mut self, id: &GameId) {
        if let Some(editor) = self.editor_mut(id) {
            editor.cancel_delete();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyCode;

    use super::super::testing::*;
    use super::*;
    use crate::catalog::EditGameForm;
    use crate::catalog::editor::EDIT_SUCCESS;
    use crate::catalog::form::NAME;
    use crate::remote::testing::FakeStore;

    fn edit_form(app: &mut App) -> &mut EditGameForm {
        let id = app.editing.clone().unwrap();
        app.editor_mut(&id).unwrap().form_mut().unwrap()
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode_state.mode, InputMode::Confirm);
        assert!(app.editor(&GameId::new("7")).unwrap().is_confirming_delete());

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.mode_state.mode, InputMode::Normal);
        settle_next(&mut app).await; // delete
        settle_next(&mut app).await; // refetch

        assert_eq!(store.calls(), vec!["list", "delete 7", "list"]);
        assert_eq!(app.editors.len(), 2);
        assert!(app.editor(&GameId::new("7")).is_none());
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));

        assert_eq!(app.mode_state.mode, InputMode::Normal);
        assert!(app.pending_action.is_none());
        assert!(!app.editor(&GameId::new("1")).unwrap().is_confirming_delete());
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_listing() {
        let store = Arc::new(FakeStore::with_games(games()));
        store.fail_delete("network down");
        let mut app = loaded(store.clone()).await;

        app.navigate(Route::Game(GameId::new("7")));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        settle_next(&mut app).await;

        assert_eq!(store.calls(), vec!["list", "delete 7"]);
        assert_eq!(app.editors.len(), 3);
        let editor = app.editor(&GameId::new("7")).unwrap();
        assert_eq!(editor.error_message(), None);
        assert!(!editor.is_busy());
    }

    #[tokio::test]
    async fn test_deleting_open_game_returns_to_root() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store.clone()).await;

        app.navigate(Route::Game(GameId::new("42")));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        settle_next(&mut app).await;
        settle_next(&mut app).await;

        assert_eq!(app.router.current(), &Route::Root);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[tokio::test]
    async fn test_blank_edit_issues_no_request() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode_state.mode, InputMode::Edit);
        edit_form(&mut app).form_mut().field_mut(NAME).value = "  ".to_string();
        press(&mut app, KeyCode::Enter);

        assert!(edit_form(&mut app).name_error().is_some());
        assert_eq!(store.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_edit_saves_and_refetches() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('e'));
        type_text(&mut app, " II");
        press(&mut app, KeyCode::Enter);
        settle_next(&mut app).await; // update
        settle_next(&mut app).await; // refetch

        assert_eq!(store.calls(), vec!["list", "update 1 Doom II http://x/doom.png", "list"]);
        let editor = app.editor(&GameId::new("1")).unwrap();
        assert_eq!(editor.game().name, "Doom II");
        assert_eq!(editor.success_message(), Some(EDIT_SUCCESS));
        assert!(editor.is_editing());
        assert_eq!(app.mode_state.mode, InputMode::Edit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode_state.mode, InputMode::Normal);
        assert!(!app.editor(&GameId::new("1")).unwrap().is_editing());
    }

    #[tokio::test]
    async fn test_rejected_edit_stays_open() {
        let store = Arc::new(FakeStore::with_games(games()));
        store.fail_update("permission denied");
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Enter);
        settle_next(&mut app).await;

        let editor = app.editor(&GameId::new("1")).unwrap();
        assert_eq!(editor.error_message(), Some("permission denied"));
        assert_eq!(editor.success_message(), None);
        assert_eq!(app.mode_state.mode, InputMode::Edit);
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_editor_state_survives_refetch() {
        let store = Arc::new(FakeStore::with_games(games()));
        store.fail_update("conflict");
        let mut app = loaded(store.clone()).await;

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Enter);
        settle_next(&mut app).await;

        app.load_games();
        settle_next(&mut app).await;
        let editor = app.editor(&GameId::new("1")).unwrap();
        assert_eq!(editor.error_message(), Some("conflict"));
        assert!(editor.is_editing());
    }
}
