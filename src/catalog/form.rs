//! Edit Game Form
//!
//! Pre-populated edit form for one game record.

use crate::form::{Form, FormField, Rule};

use super::{Game, GamePatch};

pub const ID: usize = 0;
pub const NAME: usize = 1;
pub const IMAGE_URL: usize = 2;

const BLANK: &str = "Required field";

#[derive(Debug, Clone)]
pub struct EditGameForm {
    form: Form,
}

impl EditGameForm {
    pub fn from_game(game: &Game) -> Self {
        let form = Form::new(vec![
            FormField::read_only("ID")
                .with_value(game.id.as_str())
                .rule(Rule::Required("Fill in the ID field"))
                .rule(Rule::NotBlank(BLANK)),
            FormField::text("Name")
                .with_value(game.name.as_str())
                .rule(Rule::Required("Fill in the name field"))
                .rule(Rule::NotBlank(BLANK)),
            FormField::text("Image")
                .with_value(game.image_url.as_str())
                .rule(Rule::Required("Fill in the image field"))
                .rule(Rule::NotBlank(BLANK)),
        ]);
        Self { form }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn validate(&mut self) -> bool {
        self.form.validate()
    }

    pub fn name_error(&self) -> Option<&'static str> {
        self.form.error(NAME)
    }

    pub fn image_error(&self) -> Option<&'static str> {
        self.form.error(IMAGE_URL)
    }

    /// The update body, with values exactly as typed.
    pub fn patch(&self) -> GamePatch {
        GamePatch {
            name: self.form.value(NAME).to_string(),
            image_url: self.form.value(IMAGE_URL).to_string(),
        }
    }
}
