use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    store::BookFields,
    validation::{optional_integer, required},
    view::books::BookValues,
};

pub mod add_book;
pub mod app;
pub mod delete_book;
pub mod edit_book;

/// The form used both to add and to edit a book.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct BookForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    /// Id of the current owner. Only honored on edit, empty for no owner.
    #[serde(default)]
    #[validate(custom(function = "optional_integer"))]
    pub user_id: String,
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();

    (!value.is_empty()).then_some(value)
}

impl BookForm {
    /// Must only be called on a validated form.
    pub fn fields(&self) -> BookFields<'_> {
        BookFields {
            title: self.title.trim(),
            author: non_empty(&self.author),
            genre: non_empty(&self.genre),
        }
    }

    /// The submitted owner. Must only be called on a validated form.
    pub fn owner_id(&self) -> Option<i64> {
        non_empty(&self.user_id).and_then(|user_id| user_id.parse().ok())
    }

    fn values(&self, with_owner: bool) -> BookValues<'_> {
        BookValues {
            title: &self.title,
            author: &self.author,
            genre: &self.genre,
            user_id: with_owner.then_some(self.user_id.as_str()),
        }
    }
}
