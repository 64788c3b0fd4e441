//! Popup Components
//!
//! Confirmation dialog, help screen and layout helpers for overlays.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Centered rectangle helper
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Fixed size centered rectangle
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// Confirmation dialog
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self { title, message }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = centered_rect_fixed(50, 7, area);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);
        if inner.is_empty() {
            return;
        }

        let msg = Paragraph::new(self.message)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true });
        msg.render(Rect::new(inner.x, inner.y, inner.width, inner.height.min(2)), buf);

        let hint_y = inner.y + 3;
        if hint_y >= inner.bottom() {
            return;
        }

        let hint = Line::from(vec![
            Span::styled("[y]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes  "),
            Span::styled("[n]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]);
        buf.set_line(inner.x, hint_y, &hint, inner.width);
    }
}

const TWO_COLUMN_MIN_WIDTH: u16 = 80;
const HELP_PERCENT: u16 = 65;

/// Scrollable help screen state
#[derive(Debug, Default)]
pub struct HelpState {
    pub scroll: usize,
    pub pending_g: bool,
}

impl HelpState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll = self.scroll.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize, max_scroll: usize) {
        self.scroll = (self.scroll + amount).min(max_scroll);
    }

    pub fn home(&mut self) {
        self.scroll = 0;
    }

    pub fn end(&mut self, max_scroll: usize) {
        self.scroll = max_scroll;
    }
}

/// Help screen widget
pub struct HelpScreen<'a> {
    state: &'a HelpState,
}

impl<'a> HelpScreen<'a> {
    pub fn new(state: &'a HelpState) -> Self {
        Self { state }
    }

    /// Total content height in single-column layout
    pub fn content_height() -> usize {
        build_help_lines(&help_sections()).len()
    }

    /// Rows available for content inside the popup
    pub fn visible_height(area: Rect) -> u16 {
        centered_rect(HELP_PERCENT, HELP_PERCENT, area).height.saturating_sub(2)
    }

    pub fn max_scroll(area: Rect) -> usize {
        Self::content_height().saturating_sub(Self::visible_height(area) as usize)
    }
}

impl Widget for HelpScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(HELP_PERCENT, HELP_PERCENT, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Help Page ")
            .title_bottom(Line::from(" j/k scroll • q close ").centered())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(popup);
        block.render(popup, buf);

        if inner.width >= TWO_COLUMN_MIN_WIDTH {
            render_two_columns(inner, buf, self.state.scroll);
        } else {
            render_single_column(inner, buf, self.state.scroll);
        }
    }
}

type Section = (&'static str, Vec<(&'static str, &'static str)>);

enum HelpLine {
    Header(&'static str),
    Binding(&'static str, &'static str),
    Empty,
}

fn render_single_column(area: Rect, buf: &mut Buffer, scroll: usize) {
    let lines = build_help_lines(&help_sections());
    render_lines(area.x, area, area.width, &lines, scroll, buf);
}

fn render_two_columns(area: Rect, buf: &mut Buffer, scroll: usize) {
    let sections = help_sections();
    let (left, right) = split_sections_for_columns(sections);

    let gap = 4u16;
    let col_width = (area.width.saturating_sub(gap)) / 2;
    let right_x = area.x + col_width + gap;

    render_lines(area.x, area, col_width, &build_help_lines(&left), scroll, buf);
    render_lines(right_x, area, col_width, &build_help_lines(&right), scroll, buf);
}

fn render_lines(x: u16, area: Rect, width: u16, lines: &[HelpLine], scroll: usize, buf: &mut Buffer) {
    for (i, line) in lines.iter().enumerate().skip(scroll) {
        let y = area.y + (i - scroll) as u16;
        if y >= area.y + area.height {
            break;
        }
        render_help_line(x, y, width, line, buf);
    }
}

fn build_help_lines(sections: &[Section]) -> Vec<HelpLine> {
    let mut lines = Vec::new();

    for (i, (header, bindings)) in sections.iter().enumerate() {
        lines.push(HelpLine::Header(header));
        for (key, desc) in bindings {
            lines.push(HelpLine::Binding(key, desc));
        }
        if i + 1 < sections.len() {
            lines.push(HelpLine::Empty);
        }
    }

    lines
}

fn render_help_line(x: u16, y: u16, width: u16, line: &HelpLine, buf: &mut Buffer) {
    match line {
        HelpLine::Header(title) => {
            buf.set_string(x, y, *title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        }
        HelpLine::Binding(key, desc) => {
            buf.set_string(x + 2, y, *key, Style::default().fg(Color::Cyan));
            let desc_width = width.saturating_sub(14) as usize;
            let truncated: String = desc.chars().take(desc_width).collect();
            buf.set_string(x + 14, y, &truncated, Style::default().fg(Color::Gray));
        }
        HelpLine::Empty => {}
    }
}

fn split_sections_for_columns(sections: Vec<Section>) -> (Vec<Section>, Vec<Section>) {
    let total_lines: usize = sections.iter().map(|(_, b)| b.len() + 2).sum();
    let target = total_lines / 2;

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut current_lines = 0;

    for section in sections {
        let section_lines = section.1.len() + 2;
        if current_lines < target {
            left.push(section);
        } else {
            right.push(section);
        }
        current_lines += section_lines;
    }

    (left, right)
}

fn help_sections() -> Vec<Section> {
    vec![
        (
            "Navigation",
            vec![
                ("j / ↓", "Move down"),
                ("k / ↑", "Move up"),
                ("gg", "Go to top"),
                ("G", "Go to bottom"),
                ("Ctrl-d", "Half page down"),
                ("Ctrl-u", "Half page up"),
                ("l / Enter", "Open game page"),
                ("h / Esc", "Back"),
            ],
        ),
        (
            "Games",
            vec![
                ("e", "Edit game"),
                ("dd / x", "Delete game"),
                ("Ctrl-r", "Reload list"),
            ],
        ),
        (
            "Forms",
            vec![
                ("Tab / ↓", "Next field"),
                ("S-Tab / ↑", "Previous field"),
                ("Enter", "Submit"),
                ("Esc", "Close"),
                ("Ctrl-s", "Show password"),
                ("Ctrl-u", "Clear field"),
            ],
        ),
        (
            "Commands",
            vec![
                (":", "Command mode"),
                (":q", "Quit"),
                (":login", "Sign in"),
                (":refresh", "Reload list"),
                (":edit", "Edit game"),
                (":delete", "Delete game"),
                (":go <path>", "Open / or /game/<id>"),
                (":clear", "Clear message"),
            ],
        ),
        (
            "Other",
            vec![
                ("a", "Sign in"),
                ("?", "Show this help"),
                ("Ctrl-l", "Clear message"),
                ("q", "Quit"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 30, 5);
        let rect = centered_rect_fixed(50, 7, area);
        assert_eq!(rect, Rect::new(0, 0, 30, 5));
    }

    #[test]
    fn test_help_scroll_bounds() {
        let area = Rect::new(0, 0, 60, 20);
        let max = HelpScreen::max_scroll(area);
        assert!(max > 0);

        let mut state = HelpState::new();
        state.scroll_down(1000, max);
        assert_eq!(state.scroll, max);
        state.scroll_up(1000);
        assert_eq!(state.scroll, 0);
    }
}
