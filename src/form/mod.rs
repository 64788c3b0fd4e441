//! Form State
//!
//! Text fields with per-field validation rules and field-level messages.

/// Validation rule attached to a field. Rules run in order and the first
/// failing rule's message becomes the field's message.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must not be the empty string
    Required(&'static str),
    /// Value must not be empty after trimming whitespace
    NotBlank(&'static str),
    /// Non-empty values must satisfy the predicate
    Pattern(fn(&str) -> bool, &'static str),
}

impl Rule {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        match *self {
            Self::Required(msg) if value.is_empty() => Err(msg),
            Self::NotBlank(msg) if value.trim().is_empty() => Err(msg),
            Self::Pattern(matches, msg) if !value.is_empty() && !matches(value) => Err(msg),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    ReadOnly,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub rules: Vec<Rule>,
    pub error: Option<&'static str>,
}

impl FormField {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            kind: FieldKind::Text,
            rules: Vec::new(),
            error: None,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self { kind: FieldKind::Secret, ..Self::text(label) }
    }

    pub fn read_only(label: &'static str) -> Self {
        Self { kind: FieldKind::ReadOnly, ..Self::text(label) }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required(_)))
    }

    pub fn is_editable(&self) -> bool {
        self.kind != FieldKind::ReadOnly
    }

    fn validate(&mut self) -> bool {
        self.error = self.rules.iter().find_map(|rule| rule.check(&self.value).err());
        self.error.is_none()
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Form state: fields, focus, and a character cursor in the focused field.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub active_field: usize,
    pub cursor: usize,
    pub show_secret: bool,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let active_field = fields.iter().position(FormField::is_editable).unwrap_or(0);
        let cursor = fields.get(active_field).map_or(0, FormField::char_len);
        Self {
            fields,
            active_field,
            cursor,
            show_secret: false,
        }
    }

    pub fn field_mut(&mut self, index: usize) -> &mut FormField {
        &mut self.fields[index]
    }

    pub fn value(&self, index: usize) -> &str {
        &self.fields[index].value
    }

    pub fn error(&self, index: usize) -> Option<&'static str> {
        self.fields[index].error
    }

    pub fn active_field(&self) -> &FormField {
        &self.fields[self.active_field]
    }

    /// Runs every field's rules, recording field-level messages.
    pub fn validate(&mut self) -> bool {
        self.fields
            .iter_mut()
            .map(FormField::validate)
            .fold(true, |ok, field_ok| ok && field_ok)
    }

    pub fn next_field(&mut self) {
        self.step_focus(1);
    }

    pub fn prev_field(&mut self) {
        self.step_focus(self.fields.len() - 1);
    }

    fn step_focus(&mut self, step: usize) {
        let len = self.fields.len();
        for _ in 0..len {
            self.active_field = (self.active_field + step) % len;
            if self.fields[self.active_field].is_editable() {
                break;
            }
        }
        self.cursor = self.fields[self.active_field].char_len();
    }

    pub fn insert_char(&mut self, c: char) {
        let field = &mut self.fields[self.active_field];
        if !field.is_editable() {
            return;
        }
        let at = field.byte_offset(self.cursor);
        field.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn delete_char(&mut self) {
        let field = &mut self.fields[self.active_field];
        if self.cursor == 0 || !field.is_editable() {
            return;
        }
        self.cursor -= 1;
        let at = field.byte_offset(self.cursor);
        field.value.remove(at);
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.active_field().char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.active_field().char_len();
    }

    pub fn clear_field(&mut self) {
        let field = &mut self.fields[self.active_field];
        if field.is_editable() {
            field.value.clear();
            self.cursor = 0;
        }
    }

    pub fn toggle_secret_visibility(&mut self) {
        self.show_secret = !self.show_secret;
    }
}
