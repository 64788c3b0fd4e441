use tracing::debug;

use crate::input::keymap::{Action, parse_command};
use crate::router::Route;
use crate::ui::components::{ListViewState, MessageType};

use super::App;
use super::config::PendingAction;

impl App {
    pub fn execute_action(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.list_state.move_up(),
            Action::MoveDown => self.list_state.move_down(),
            Action::MoveToTop => self.list_state.move_to_top(),
            Action::MoveToBottom => self.list_state.move_to_bottom(),
            Action::PageUp => self.page_move(|ls, h| ls.page_up(h.saturating_sub(1))),
            Action::PageDown => self.page_move(|ls, h| ls.page_down(h.saturating_sub(1))),
            Action::HalfPageUp => self.page_move(|ls, h| ls.page_up(h / 2)),
            Action::HalfPageDown => self.page_move(|ls, h| ls.page_down(h / 2)),

            Action::Select => self.open_game(),
            Action::Back => self.go_back(),
            Action::Navigate(path) => self.navigate_to_path(&path),

            Action::Edit => self.open_edit(),
            Action::Delete => self.request_delete(),
            Action::Refresh => self.load_games(),
            Action::Login => self.open_login(),

            Action::EnterCommand => self.mode_state.to_command(),
            Action::ShowHelp => self.show_help(),
            Action::ExecuteCommand(cmd) => self.execute_action(parse_command(&cmd)),

            Action::Confirm => self.handle_confirm(),
            Action::Cancel => self.cancel_pending(),

            Action::Clear => self.message = None,
            Action::Quit => self.should_quit = true,
            Action::Invalid(cmd) => self.set_message(&format!("Unknown command: {}", cmd), MessageType::Error),

            _ => {}
        }
    }

    fn page_move(&mut self, f: impl FnOnce(&mut ListViewState, usize)) {
        let visible = self.list_visible_height();
        f(&mut self.list_state, visible);
    }

    pub fn list_visible_height(&self) -> usize {
        (self.terminal_size.height as usize).saturating_sub(4)
    }

    fn navigate_to_path(&mut self, path: &str) {
        match Route::parse(path) {
            Some(route) => self.navigate(route),
            None => self.set_message(&format!("No such page: {}", path), MessageType::Error),
        }
    }

    fn show_help(&mut self) {
        self.help_state.home();
        self.help_state.pending_g = false;
        self.mode_state.to_help();
    }

    fn cancel_pending(&mut self) {
        if let Some(PendingAction::DeleteGame(id)) = self.pending_action.take() {
            debug!(%id, "delete declined");
            self.cancel_delete(&id);
        }
        self.mode_state.to_normal();
    }

    fn handle_confirm(&mut self) {
        if let Some(PendingAction::DeleteGame(id)) = self.pending_action.take() {
            self.confirm_delete(&id);
        }
        self.mode_state.to_normal();
    }
}
