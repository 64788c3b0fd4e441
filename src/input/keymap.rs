//! Keymap
//!
//! Vim-style key bindings mapped to actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,

    // Routing
    Select,
    Back,
    Navigate(String),

    // Games
    Edit,
    Delete,
    Refresh,

    // Session
    Login,

    // Mode changes
    EnterCommand,
    ShowHelp,

    // Commands
    ExecuteCommand(String),

    // Confirmation
    Confirm,
    Cancel,

    // Application
    Clear,
    Quit,

    // Text input
    InsertChar(char),
    DeleteChar,
    DeleteCharForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ClearLine,
    Submit,

    Invalid(String),

    // No action
    None,
}

/// Map key event to action in normal mode
pub fn normal_mode_action(key: KeyEvent, pending: Option<char>) -> (Action, Option<char>) {
    match (key.code, key.modifiers, pending) {
        // Navigation
        (KeyCode::Char('j') | KeyCode::Down, _, _) => (Action::MoveDown, None),
        (KeyCode::Char('k') | KeyCode::Up, _, _) => (Action::MoveUp, None),
        (KeyCode::Char('g'), _, None) => (Action::None, Some('g')),
        (KeyCode::Char('g'), _, Some('g')) => (Action::MoveToTop, None),
        (KeyCode::Char('G'), _, _) => (Action::MoveToBottom, None),
        (KeyCode::Char('d'), KeyModifiers::CONTROL, _) => (Action::HalfPageDown, None),
        (KeyCode::Char('u'), KeyModifiers::CONTROL, _) => (Action::HalfPageUp, None),
        (KeyCode::PageDown, _, _) => (Action::PageDown, None),
        (KeyCode::PageUp, _, _) => (Action::PageUp, None),

        // Routing
        (KeyCode::Char('l'), KeyModifiers::CONTROL, _) => (Action::Clear, None),
        (KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right, _, _) => (Action::Select, None),
        (KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left, _, _) => (Action::Back, None),

        // Games
        (KeyCode::Char('e'), _, _) => (Action::Edit, None),
        (KeyCode::Char('d'), _, None) => (Action::None, Some('d')),
        (KeyCode::Char('d'), _, Some('d')) => (Action::Delete, None),
        (KeyCode::Char('x'), _, _) => (Action::Delete, None),
        (KeyCode::Char('r'), KeyModifiers::CONTROL, _) => (Action::Refresh, None),

        // Session
        (KeyCode::Char('a'), _, _) => (Action::Login, None),

        // Mode changes
        (KeyCode::Char(':'), _, _) => (Action::EnterCommand, None),
        (KeyCode::Char('?'), _, _) => (Action::ShowHelp, None),

        // Application
        (KeyCode::Char('q'), _, _) => (Action::Quit, None),

        _ => (Action::None, None),
    }
}

/// Map key event to action in text input modes
pub fn text_input_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Delete, _) => Action::DeleteCharForward,
        (KeyCode::Left, _) => Action::CursorLeft,
        (KeyCode::Right, _) => Action::CursorRight,
        (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => Action::CursorHome,
        (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => Action::CursorEnd,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearLine,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Action::InsertChar(c),
        _ => Action::None,
    }
}

/// Map key event to action in confirm mode
pub fn confirm_action(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

/// Parse command string into action
pub fn parse_command(cmd: &str) -> Action {
    let cmd = cmd.trim();
    let (command, args) = match cmd.split_once(' ') {
        Some((command, args)) => (command, args.trim()),
        None => (cmd, ""),
    };

    match command {
        "" => Action::None,
        "cls" | "clear" => Action::Clear,
        "q" | "quit" | "q!" | "quit!" => Action::Quit,
        "login" | "signin" => Action::Login,
        "refresh" | "reload" => Action::Refresh,
        "edit" | "e" => Action::Edit,
        "delete" | "del" => Action::Delete,
        "help" | "h" => Action::ShowHelp,
        "go" | "open" if !args.is_empty() => Action::Navigate(args.to_string()),
        _ => Action::Invalid(cmd.to_string()),
    }
}
