use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::form::Form;
use crate::input::keymap::{Action, confirm_action, normal_mode_action, text_input_action};
use crate::input::modes::InputMode;
use crate::ui::components::HelpScreen;

use super::App;

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.mode_state.mode {
            InputMode::Edit => self.handle_edit_key(key),
            InputMode::Login => self.handle_login_key(key),
            InputMode::Help => help_key_handler(self, key.code, key.modifiers),
            _ => {
                let action = self.resolve_action(key);
                self.execute_action(action);
            }
        }
    }

    fn resolve_action(&mut self, key: KeyEvent) -> Action {
        match self.mode_state.mode {
            InputMode::Normal => self.resolve_normal_action(key),
            InputMode::Command => self.resolve_text_action(key),
            InputMode::Confirm => confirm_action(key),
            _ => Action::None,
        }
    }

    fn resolve_normal_action(&mut self, key: KeyEvent) -> Action {
        let (action, pending) = normal_mode_action(key, self.mode_state.pending);
        self.mode_state.pending = pending;
        action
    }

    fn resolve_text_action(&mut self, key: KeyEvent) -> Action {
        let action = text_input_action(key);
        self.handle_text_input(action)
    }

    fn handle_text_input(&mut self, action: Action) -> Action {
        match action {
            Action::InsertChar(c) => self.mode_state.insert_char(c),
            Action::DeleteChar => self.mode_state.delete_char(),
            Action::DeleteCharForward => self.mode_state.delete_char_forward(),
            Action::CursorLeft => self.mode_state.cursor_left(),
            Action::CursorRight => self.mode_state.cursor_right(),
            Action::CursorHome => self.mode_state.cursor_home(),
            Action::CursorEnd => self.mode_state.cursor_end(),
            Action::ClearLine => self.mode_state.clear_buffer(),
            Action::Submit => return self.submit_text_input(),
            Action::Cancel => self.mode_state.to_normal(),
            _ => return action,
        }
        Action::None
    }

    fn submit_text_input(&mut self) -> Action {
        let buffer = self.mode_state.get_buffer().to_string();
        self.mode_state.to_normal();
        Action::ExecuteCommand(buffer)
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.close_edit(),
            (KeyCode::Enter, KeyModifiers::NONE) => self.submit_edit(),
            (code, mods) => {
                let Some(id) = self.editing.clone() else {
                    self.mode_state.to_normal();
                    return;
                };
                if let Some(form) = self.editor_mut(&id).and_then(|e| e.form_mut()) {
                    dispatch_form_key(form.form_mut(), code, mods);
                }
            }
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.close_login(),
            (KeyCode::Enter, KeyModifiers::NONE) => self.submit_login(),
            (code, mods) => dispatch_form_key(self.login.form_mut().form_mut(), code, mods),
        }
    }
}

fn dispatch_form_key(form: &mut Form, code: KeyCode, mods: KeyModifiers) {
    match (code, mods) {
        (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Down, _) => form.next_field(),
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => form.prev_field(),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => form.toggle_secret_visibility(),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => form.clear_field(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => form.insert_char(c),
        (KeyCode::Backspace, _) => form.delete_char(),
        (KeyCode::Left, _) => form.cursor_left(),
        (KeyCode::Right, _) => form.cursor_right(),
        (KeyCode::Home, _) => form.cursor_home(),
        (KeyCode::End, _) => form.cursor_end(),
        _ => {}
    }
}

fn help_key_handler(app: &mut App, code: KeyCode, mods: KeyModifiers) {
    match (code, mods) {
        (KeyCode::Char('?'), KeyModifiers::NONE | KeyModifiers::SHIFT)
        | (KeyCode::Char('q'), KeyModifiers::NONE)
        | (KeyCode::Esc, _) => {
            app.mode_state.to_normal();
            return;
        }
        _ => {}
    }

    let was_pending = app.help_state.pending_g;
    app.help_state.pending_g = false;

    let size = app.terminal_size;
    let visible = HelpScreen::visible_height(size) as usize;
    let max_v = HelpScreen::max_scroll(size);

    match (code, mods) {
        (KeyCode::Char('g'), KeyModifiers::NONE) if was_pending => app.help_state.home(),
        (KeyCode::Char('g'), KeyModifiers::NONE) => app.help_state.pending_g = true,
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => app.help_state.scroll_down(1, max_v),
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => app.help_state.scroll_up(1),
        (KeyCode::Char('G'), _) => app.help_state.end(max_v),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => app.help_state.scroll_down(visible / 2, max_v),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => app.help_state.scroll_up(visible / 2),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::layout::Rect;

    use super::super::testing::*;
    use super::*;
    use crate::remote::testing::FakeStore;

    #[tokio::test]
    async fn test_command_line_round_trip() {
        let store = Arc::new(FakeStore::with_games(games()));
        let mut app = loaded(store).await;

        press(&mut app, KeyCode::Char(':'));
        assert_eq!(app.mode_state.mode, InputMode::Command);
        type_text(&mut app, "login");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode_state.mode, InputMode::Login);
        assert!(app.login.is_open());
    }

    #[tokio::test]
    async fn test_help_scrolls_and_closes() {
        let store = Arc::new(FakeStore::default());
        let mut app = loaded(store).await;
        app.terminal_size = Rect::new(0, 0, 60, 20);

        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode_state.mode, InputMode::Help);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.help_state.scroll, 2);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.help_state.scroll, 0);

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode_state.mode, InputMode::Normal);
    }

    #[test]
    fn test_form_keys() {
        let mut form = Form::new(vec![
            crate::form::FormField::text("Name").with_value("ab"),
            crate::form::FormField::text("Image"),
        ]);
        dispatch_form_key(&mut form, KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(form.value(0), "abc");

        dispatch_form_key(&mut form, KeyCode::Tab, KeyModifiers::NONE);
        dispatch_form_key(&mut form, KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(form.value(1), "X");

        dispatch_form_key(&mut form, KeyCode::BackTab, KeyModifiers::SHIFT);
        dispatch_form_key(&mut form, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(form.value(0), "");
    }
}
