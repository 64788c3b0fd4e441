//! Renderer
//!
//! Main rendering logic for the application.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};

use super::components::{
    ConfirmDialog, EmptyState, FormWidget, GameDetail, GameList, HelpBar, HelpScreen, HelpState,
    ListViewState, MessageType, StatusLine,
};
use crate::auth::LoginControl;
use crate::catalog::RowEditor;
use crate::catalog::editor::Pending;
use crate::input::InputMode;
use crate::router::Route;

pub struct UiState<'a> {
    pub route: &'a Route,
    pub mode: InputMode,
    pub rows: &'a [RowEditor],
    pub list_state: &'a mut ListViewState,
    pub loading: bool,
    pub load_error: Option<&'a str>,
    pub command_buffer: Option<&'a str>,
    pub message: Option<(&'a str, MessageType)>,
    pub confirm_message: Option<&'a str>,
    pub editing: Option<&'a RowEditor>,
    pub login: &'a LoginControl,
    pub user: Option<&'a str>,
    pub help_state: &'a HelpState,
}

pub struct Renderer;

impl Renderer {
    pub fn hex_color(rgb: u32) -> Color {
        Color::Rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    pub fn render(frame: &mut Frame, state: &mut UiState) {
        let size = frame.area();
        let chunks = create_main_layout(size);

        render_content(frame, chunks[0], state);
        render_status_line(frame, chunks[1], state);
        render_help_bar(frame, chunks[2], state.mode);
        render_overlays(frame, size, state);
    }
}

fn create_main_layout(size: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size)
}

fn render_content(frame: &mut Frame, area: Rect, state: &mut UiState) {
    match state.route {
        Route::Root => render_list(frame, area, state, Color::Magenta),
        Route::Game(_) => render_detail(frame, area, state),
    }
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &UiState) {
    let path = state.route.path();
    let mut status = StatusLine::new(state.mode).route(&path).loading(state.loading);

    if let Some(buffer) = state.command_buffer {
        status = status.command_buffer(buffer);
    } else if let Some((msg, msg_type)) = state.message {
        status = status.message(msg, msg_type);
    }

    if let Some(user) = state.user {
        status = status.user(user);
    }

    if let Some(selected) = state.list_state.selected() {
        status = status.item_count(selected, state.list_state.total);
    }

    frame.render_widget(status, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    frame.render_widget(HelpBar::for_mode(mode), area);
}

fn render_list(frame: &mut Frame, area: Rect, state: &mut UiState, border: Color) {
    if state.rows.is_empty() {
        let empty = match (state.loading, state.load_error) {
            (true, _) => EmptyState::new("Loading games..."),
            (false, Some(error)) => EmptyState::new(error).hint("Press Ctrl-r to retry"),
            (false, None) => EmptyState::new("No games"),
        };
        frame.render_widget(empty, area);
        return;
    }

    let list = GameList::new(state.rows).block(create_games_block(border));
    frame.render_stateful_widget(list, area, state.list_state);
}

fn render_detail(frame: &mut Frame, area: Rect, state: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_list(frame, chunks[0], state, Color::DarkGray);

    let row = match state.route {
        Route::Game(id) => state.rows.iter().find(|row| &row.game().id == id),
        Route::Root => None,
    };
    match row {
        Some(row) => frame.render_widget(GameDetail::new(row), chunks[1]),
        None if state.loading => frame.render_widget(EmptyState::new("Loading..."), chunks[1]),
        None => frame.render_widget(EmptyState::new("Game not found"), chunks[1]),
    }
}

fn create_games_block(border_color: Color) -> Block<'static> {
    Block::default()
        .title(" Games ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
}

fn render_overlays(frame: &mut Frame, area: Rect, state: &UiState) {
    match state.mode {
        InputMode::Help => frame.render_widget(HelpScreen::new(state.help_state), area),
        InputMode::Confirm => render_confirm_overlay(frame, area, state),
        InputMode::Edit => render_edit_overlay(frame, area, state),
        InputMode::Login => render_login_overlay(frame, area, state),
        InputMode::Normal | InputMode::Command => {}
    }
}

fn render_confirm_overlay(frame: &mut Frame, area: Rect, state: &UiState) {
    if let Some(msg) = state.confirm_message {
        frame.render_widget(ConfirmDialog::new(" Confirm ", msg), area);
    }
}

fn render_edit_overlay(frame: &mut Frame, area: Rect, state: &UiState) {
    let Some(row) = state.editing else { return };
    let Some(form) = row.form() else { return };

    let widget = FormWidget::new(form.form(), " Edit game ")
        .busy(row.pending() == Some(Pending::Update))
        .error(row.error_message())
        .success(row.success_message());
    frame.render_widget(widget, area);
}

fn render_login_overlay(frame: &mut Frame, area: Rect, state: &UiState) {
    let login = state.login;
    if !login.is_open() {
        return;
    }

    let widget = FormWidget::new(login.form().form(), " Login ")
        .button("Sign in", "Signing in...")
        .busy(login.is_loading())
        .error(login.error_message());
    frame.render_widget(widget, area);
}
