//! Detail View Component
//!
//! Panel shown on `/game/{id}` for the selected record.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::catalog::RowEditor;
use crate::catalog::editor::Pending;

pub struct GameDetail<'a> {
    row: &'a RowEditor,
}

impl<'a> GameDetail<'a> {
    pub fn new(row: &'a RowEditor) -> Self {
        Self { row }
    }
}

impl Widget for GameDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = self.row.game();
        let block = Block::default()
            .title(format!(" {} ", game.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut y = inner.y;
        let value_style = Style::default().fg(Color::White);

        render_field(buf, inner, &mut y, "ID", &[Span::styled(game.id.as_str(), value_style)]);
        render_field(buf, inner, &mut y, "Name", &[Span::styled(game.name.as_str(), value_style)]);

        let image = if game.image_url.is_empty() {
            Span::styled("(none)", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(game.image_url.as_str(), Style::default().fg(Color::Blue))
        };
        render_field(buf, inner, &mut y, "Image", &[image]);

        if let Some(pending) = self.row.pending() {
            let label = match pending {
                Pending::Delete => "Deleting...",
                Pending::Update => "Saving...",
            };
            render_field(buf, inner, &mut y, "Status", &[Span::styled(
                label,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            )]);
        }

        y += 1;
        if y >= inner.bottom() {
            return;
        }
        if let Some(error) = self.row.error_message() {
            let remaining = inner.height.saturating_sub(y - inner.y);
            Paragraph::new(error)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .render(Rect::new(inner.x, y, inner.width, remaining), buf);
        } else if let Some(success) = self.row.success_message() {
            buf.set_string(inner.x, y, success, Style::default().fg(Color::Green));
        }
    }
}

fn render_field(buf: &mut Buffer, inner: Rect, y: &mut u16, label: &str, value: &[Span]) {
    if *y >= inner.y + inner.height {
        return;
    }
    buf.set_string(inner.x, *y, format!("{}:", label), Style::default().fg(Color::DarkGray));

    let value_x = inner.x + 10;
    let line = Line::from(value.to_vec());
    buf.set_line(value_x, *y, &line, inner.width.saturating_sub(10));

    *y += 1;
}
