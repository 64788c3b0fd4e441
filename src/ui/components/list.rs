//! List View Component
//!
//! Displays the catalog in a scrollable list.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::catalog::RowEditor;
use crate::catalog::editor::Pending;
use crate::ui::renderer::Renderer;

#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    pub selected: Option<usize>,
    pub total: usize,
    list_state: ListState,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
        self.list_state.select(index);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.select(compute_selection_after_total_change(self.selected, total));
    }

    pub fn move_up(&mut self) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.unwrap_or(0).saturating_sub(1);
        self.select(Some(new_index));
    }

    pub fn move_down(&mut self) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.map_or(0, |i| (i + 1).min(self.total - 1));
        self.select(Some(new_index));
    }

    pub fn move_to_top(&mut self) {
        if self.total > 0 {
            self.select(Some(0));
        }
    }

    pub fn move_to_bottom(&mut self) {
        if self.total > 0 {
            self.select(Some(self.total - 1));
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.unwrap_or(0).saturating_sub(page_size);
        self.select(Some(new_index));
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.total == 0 {
            return;
        }
        let new_index = self.selected.map_or(0, |i| (i + page_size).min(self.total - 1));
        self.select(Some(new_index));
    }

    pub fn list_state_mut(&mut self) -> &mut ListState {
        &mut self.list_state
    }
}

fn compute_selection_after_total_change(selected: Option<usize>, total: usize) -> Option<usize> {
    if total == 0 {
        return None;
    }
    match selected {
        Some(sel) if sel >= total => Some(total - 1),
        Some(sel) => Some(sel),
        None => Some(0),
    }
}

pub struct GameList<'a> {
    rows: &'a [RowEditor],
    block: Option<Block<'a>>,
    highlight_style: Style,
}

impl<'a> GameList<'a> {
    pub fn new(rows: &'a [RowEditor]) -> Self {
        Self {
            rows,
            block: None,
            highlight_style: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

fn build_selection_symbol(is_selected: bool) -> Span<'static> {
    if is_selected {
        Span::styled("▌ ", Style::default().fg(Color::Magenta).bg(Color::DarkGray))
    } else {
        Span::raw("  ")
    }
}

fn status_span(row: &RowEditor, base_style: Style) -> Option<Span<'static>> {
    match row.pending() {
        Some(Pending::Delete) => Some(Span::styled(" deleting...", base_style.fg(Color::Red))),
        Some(Pending::Update) => Some(Span::styled(" saving...", base_style.fg(Color::Yellow))),
        None if row.error_message().is_some() => Some(Span::styled(" !", base_style.fg(Color::Red))),
        None => None,
    }
}

fn build_list_item<'a>(row: &'a RowEditor, index: usize, selected: Option<usize>, highlight_style: Style) -> ListItem<'a> {
    let is_selected = Some(index) == selected;
    let base_style = if is_selected { highlight_style } else { Style::default() };
    let game = row.game();

    let mut spans = vec![
        build_selection_symbol(is_selected),
        Span::styled(format!("#{:<5} ", game.id), base_style.fg(Renderer::hex_color(0x4C566A))),
        Span::styled(game.name.as_str(), base_style.fg(Color::White)),
    ];
    spans.extend(status_span(row, base_style));

    let mut item = ListItem::new(Line::from(spans));
    if is_selected {
        item = item.style(highlight_style);
    }
    item
}

impl<'a> StatefulWidget for GameList<'a> {
    type State = ListViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let selected = state.selected();

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| build_list_item(row, i, selected, self.highlight_style))
            .collect();

        let list = List::new(items);
        let list = match self.block {
            Some(block) => list.block(block),
            None => list,
        };

        StatefulWidget::render(list, area, buf, state.list_state_mut());
    }
}

pub struct EmptyState<'a> {
    message: &'a str,
    hint: Option<&'a str>,
}

impl<'a> EmptyState<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message, hint: None }
    }

    pub fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }
}

fn center_x(area: &Rect, text_len: usize) -> u16 {
    area.x + (area.width.saturating_sub(text_len as u16)) / 2
}

impl<'a> Widget for EmptyState<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let center_y = area.y + area.height / 2;
        let msg_x = center_x(&area, self.message.len());
        buf.set_string(msg_x, center_y, self.message, Style::default().fg(Color::DarkGray));
        render_optional_hint(buf, &area, center_y, self.hint);
    }
}

fn render_optional_hint(buf: &mut Buffer, area: &Rect, center_y: u16, hint: Option<&str>) {
    let Some(hint) = hint else { return };
    if center_y + 1 >= area.bottom() {
        return;
    }
    let hint_x = center_x(area, hint.len());
    let style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    buf.set_string(hint_x, center_y + 1, hint, style);
}
