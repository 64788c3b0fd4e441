//! Status Line Component
//!
//! Displays mode indicator, messages, the signed-in user and position.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::input::InputMode;

/// Message type for status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::White,
            Self::Success => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Status line widget
pub struct StatusLine<'a> {
    mode: InputMode,
    command_buffer: Option<&'a str>,
    message: Option<(&'a str, MessageType)>,
    route: Option<&'a str>,
    user: Option<&'a str>,
    loading: bool,
    item_count: Option<(usize, usize)>,
}

impl<'a> StatusLine<'a> {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            command_buffer: None,
            message: None,
            route: None,
            user: None,
            loading: false,
            item_count: None,
        }
    }

    pub fn command_buffer(mut self, buffer: &'a str) -> Self {
        self.command_buffer = Some(buffer);
        self
    }

    pub fn message(mut self, msg: &'a str, msg_type: MessageType) -> Self {
        self.message = Some((msg, msg_type));
        self
    }

    pub fn route(mut self, path: &'a str) -> Self {
        self.route = Some(path);
        self
    }

    pub fn user(mut self, user: &'a str) -> Self {
        self.user = Some(user);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn item_count(mut self, selected: usize, total: usize) -> Self {
        self.item_count = Some((selected, total));
        self
    }
}

fn mode_style(mode: InputMode) -> Style {
    let bg = match mode {
        InputMode::Normal => Color::Blue,
        InputMode::Command => Color::Red,
        InputMode::Confirm => Color::Red,
        InputMode::Help => Color::Yellow,
        InputMode::Edit => Color::Green,
        InputMode::Login => Color::Magenta,
    };
    Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
}

impl<'a> Widget for StatusLine<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        buf.set_style(area, Style::default().bg(Color::DarkGray));

        let mut x = area.x;

        let mode_text = format!(" {} ", self.mode.indicator());
        buf.set_string(x, area.y, &mode_text, mode_style(self.mode));
        x += mode_text.len() as u16 + 1;

        if let Some(buffer) = self.command_buffer {
            let cmd_text = format!(":{}", buffer);
            buf.set_string(x, area.y, &cmd_text, Style::default().fg(Color::White).bg(Color::DarkGray));
        } else if let Some((msg, msg_type)) = self.message {
            buf.set_string(x, area.y, msg, Style::default().fg(msg_type.color()).bg(Color::DarkGray));
        } else if self.loading {
            buf.set_string(x, area.y, "Loading...", Style::default().fg(Color::Gray).bg(Color::DarkGray));
        }

        let mut right_parts: Vec<String> = Vec::new();
        if let Some(user) = self.user {
            right_parts.push(user.to_string());
        }
        if let Some(route) = self.route {
            right_parts.push(route.to_string());
        }
        if let Some((selected, total)) = self.item_count {
            right_parts.push(format!("{}/{}", selected + 1, total));
        }

        let right_text = right_parts.join(" │ ");
        let right_x = area.x + area.width.saturating_sub(right_text.chars().count() as u16 + 1);
        buf.set_string(right_x, area.y, &right_text, Style::default().fg(Color::Gray).bg(Color::DarkGray));
    }
}

/// Help bar widget
pub struct HelpBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
}

impl<'a> HelpBar<'a> {
    pub fn for_mode(mode: InputMode) -> Self {
        let hints = match mode {
            InputMode::Normal => vec![
                ("j/k", "navigate"),
                ("Enter", "open"),
                ("e", "edit"),
                ("dd", "delete"),
                ("a", "login"),
                ("C-r", "reload"),
                (":", "command"),
                ("?", "help"),
            ],
            InputMode::Command => vec![("Esc", "cancel"), ("Enter", "execute")],
            InputMode::Confirm => vec![("y", "yes"), ("n", "no")],
            InputMode::Help => vec![("q", "close"), ("j/k", "scroll")],
            InputMode::Edit => vec![("Tab", "next field"), ("Enter", "save"), ("Esc", "close")],
            InputMode::Login => vec![
                ("Tab", "next field"),
                ("Enter", "sign in"),
                ("C-s", "show password"),
                ("Esc", "close"),
            ],
        };
        Self { hints }
    }
}

impl<'a> Widget for HelpBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)));
            spans.push(Span::styled(format!(" {}", desc), Style::default().fg(Color::Gray)));
        }
        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
