use axum::response::Html;

use crate::store::User;

use super::{
    form::{self, FieldErrors, InputKind},
    layout,
};

/// Values shown in the book form.
#[derive(Debug, Default, Clone, Copy)]
pub struct BookValues<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub genre: &'a str,
    /// `None` hides the owner field.
    pub user_id: Option<&'a str>,
}

pub fn book_page(
    heading: &str,
    action: &str,
    user: &User,
    values: BookValues<'_>,
    errors: &FieldErrors,
    message: Option<&str>,
) -> Html<String> {
    let mut fields = vec![
        form::message(message),
        form::input("Title", "title", InputKind::Text, values.title, errors),
        form::input("Author", "author", InputKind::Text, values.author, errors),
        form::input("Genre", "genre", InputKind::Text, values.genre, errors),
    ];

    if let Some(user_id) = values.user_id {
        fields.push(form::input(
            "Current owner id",
            "user_id",
            InputKind::Number,
            user_id,
            errors,
        ));
    }

    layout(
        heading,
        Some(user),
        &form::form(action, &fields.concat(), "Apply"),
    )
}
