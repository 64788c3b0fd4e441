//! Input Modes
//!
//! Modal editing state machine for vim-style interface.

/// Input mode enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Command line mode (:)
    Command,
    /// Confirmation dialog
    Confirm,
    /// Help screen
    Help,
    /// Edit modal of a game
    Edit,
    /// Login modal
    Login,
}

impl InputMode {
    /// Get mode indicator for status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Command => "COMMAND",
            Self::Confirm => "CONFIRM",
            Self::Help => "HELP",
            Self::Edit => "EDIT",
            Self::Login => "LOGIN",
        }
    }

    /// Check if mode accepts text input
    pub fn is_text_input(&self) -> bool {
        matches!(self, Self::Command)
    }
}

/// Mode state with associated data
#[derive(Debug, Clone)]
pub struct ModeState {
    /// Current mode
    pub mode: InputMode,
    /// Text buffer for the command line
    pub buffer: String,
    /// Cursor position in buffer, in characters
    pub cursor: usize,
    /// Pending key sequence (for multi-key commands like gg, dd)
    pub pending: Option<char>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            buffer: String::new(),
            cursor: 0,
            pending: None,
        }
    }
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a new mode
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.buffer.clear();
        self.cursor = 0;
        self.pending = None;
    }

    pub fn to_normal(&mut self) {
        self.set_mode(InputMode::Normal);
    }

    pub fn to_command(&mut self) {
        self.set_mode(InputMode::Command);
    }

    pub fn to_confirm(&mut self) {
        self.set_mode(InputMode::Confirm);
    }

    pub fn to_help(&mut self) {
        self.set_mode(InputMode::Help);
    }

    pub fn to_edit(&mut self) {
        self.set_mode(InputMode::Edit);
    }

    pub fn to_login(&mut self) {
        self.set_mode(InputMode::Login);
    }

    fn byte_offset(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert character at cursor
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset();
            self.buffer.remove(at);
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset();
            self.buffer.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn get_buffer(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_transitions() {
        let mut state = ModeState::new();
        assert_eq!(state.mode, InputMode::Normal);

        state.to_edit();
        assert_eq!(state.mode, InputMode::Edit);

        state.to_command();
        assert_eq!(state.mode, InputMode::Command);

        state.to_normal();
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn test_command_mode_input() {
        let mut state = ModeState::new();
        state.to_command();
        for c in "login".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.get_buffer(), "login");

        state.delete_char();
        assert_eq!(state.get_buffer(), "logi");
    }

    #[test]
    fn test_mode_switch_clears_pending() {
        let mut state = ModeState::new();
        state.pending = Some('d');
        state.to_confirm();
        assert_eq!(state.pending, None);
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = ModeState::new();
        state.to_command();
        for c in "go /game/é".chars() {
            state.insert_char(c);
        }

        state.cursor_home();
        assert_eq!(state.cursor, 0);

        state.cursor_end();
        assert_eq!(state.cursor, 10);

        state.cursor_left();
        state.delete_char_forward();
        assert_eq!(state.get_buffer(), "go /game/");

        state.cursor_right();
        assert_eq!(state.cursor, 9);
    }

    #[test]
    fn test_is_text_input() {
        assert!(!InputMode::Normal.is_text_input());
        assert!(InputMode::Command.is_text_input());
        assert!(!InputMode::Login.is_text_input());
        assert!(!InputMode::Help.is_text_input());
    }
}
