//! Form Modal Component
//!
//! Renders a `Form` as a centered modal: one row per field with its
//! field-level message underneath, then the status line and button.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Widget},
};

use crate::form::{FieldKind, Form, FormField};

const LABEL_WIDTH: u16 = 14;
const FORM_WIDTH: u16 = 64;

pub struct FormWidget<'a> {
    form: &'a Form,
    title: &'a str,
    button: &'a str,
    busy_button: &'a str,
    busy: bool,
    error: Option<&'a str>,
    success: Option<&'a str>,
}

impl<'a> FormWidget<'a> {
    pub fn new(form: &'a Form, title: &'a str) -> Self {
        Self {
            form,
            title,
            button: "Save",
            busy_button: "Saving...",
            busy: false,
            error: None,
            success: None,
        }
    }

    pub fn button(mut self, label: &'a str, busy_label: &'a str) -> Self {
        self.button = label;
        self.busy_button = busy_label;
        self
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn success(mut self, success: Option<&'a str>) -> Self {
        self.success = success;
        self
    }

    /// Two rows per field, plus status, button and key hints.
    fn height(&self) -> u16 {
        self.form.fields.len() as u16 * 2 + 2 + 3 + 2
    }
}

fn display_value(field: &FormField, show_secret: bool) -> String {
    match field.kind {
        FieldKind::Secret if !show_secret => "•".repeat(field.value.chars().count()),
        _ => field.value.clone(),
    }
}

fn label_style(field: &FormField, is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_field(buf: &mut Buffer, inner: Rect, y: u16, field: &FormField, is_active: bool, form: &Form) {
    let label = if field.is_required() {
        format!("{}*:", field.label)
    } else {
        format!("{}:", field.label)
    };
    buf.set_string(inner.x, y, &label, label_style(field, is_active));

    let value_x = inner.x + LABEL_WIDTH;
    let value_width = inner.width.saturating_sub(LABEL_WIDTH + 1);
    let bg = if is_active { Color::DarkGray } else { Color::Black };

    for x in value_x..value_x + value_width {
        if let Some(cell) = buf.cell_mut((x, y)) {
            cell.set_style(Style::default().bg(bg));
        }
    }

    let value_style = match field.kind {
        FieldKind::ReadOnly => Style::default().fg(Color::DarkGray),
        FieldKind::Secret => Style::default().fg(Color::Green),
        FieldKind::Text => Style::default().fg(Color::White),
    };
    // Keep the cursor in view on long values
    let scroll = if is_active {
        form.cursor.saturating_sub(value_width.saturating_sub(1) as usize)
    } else {
        0
    };
    let shown: String = display_value(field, form.show_secret)
        .chars()
        .skip(scroll)
        .take(value_width as usize)
        .collect();
    buf.set_string(value_x, y, &shown, value_style.bg(bg));

    if is_active && field.is_editable() {
        let offset = (form.cursor - scroll) as u16;
        if let Some(cell) = buf.cell_mut((value_x + offset, y)) {
            cell.set_style(Style::default().bg(Color::White).fg(Color::Black));
        }
    }

    if let Some(error) = field.error {
        buf.set_string(value_x, y + 1, error, Style::default().fg(Color::Red));
    }
}

fn render_button(buf: &mut Buffer, inner: Rect, y: u16, label: &str, busy: bool) {
    let text = format!("[ {} ]", label);
    let style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Magenta).add_modifier(Modifier::BOLD)
    };
    let x = inner.x + inner.width.saturating_sub(text.chars().count() as u16) / 2;
    buf.set_string(x, y, &text, style);
}

impl Widget for FormWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = FORM_WIDTH.min(area.width.saturating_sub(4));
        let height = self.height().min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let form_area = Rect::new(x, y, width, height);

        Clear.render(form_area, buf);

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(form_area);
        block.render(form_area, buf);
        if inner.is_empty() {
            return;
        }

        // The last row holds the key hints
        let help_y = inner.bottom() - 1;

        let mut y = inner.y;
        for (i, field) in self.form.fields.iter().enumerate() {
            if y + 1 >= help_y {
                break;
            }
            render_field(buf, inner, y, field, i == self.form.active_field, self.form);
            y += 2;
        }

        if y < help_y {
            if let Some(error) = self.error {
                buf.set_string(inner.x, y, error, Style::default().fg(Color::Red));
            } else if let Some(success) = self.success {
                buf.set_string(inner.x, y, success, Style::default().fg(Color::Green));
            }
        }
        y += 2;

        if y < help_y {
            let label = if self.busy { self.busy_button } else { self.button };
            render_button(buf, inner, y, label, self.busy);
        }

        let mut hints = vec![
            Span::styled("Tab", Style::default().fg(Color::Magenta)),
            Span::raw(" next  "),
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw(" submit  "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" close"),
        ];
        if self.form.fields.iter().any(|f| f.kind == FieldKind::Secret) {
            hints.push(Span::styled("  Ctrl+s", Style::default().fg(Color::Magenta)));
            hints.push(Span::raw(" show password"));
        }
        buf.set_line(inner.x, help_y, &Line::from(hints), inner.width);
    }
}
