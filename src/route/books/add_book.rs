use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use validator::Validate;

use crate::{
    error::ApiError,
    extractor::{current_user::CurrentUser, form::ApiForm},
    server_error,
    state::ApiState,
    store::Book,
    traits::StateProvider,
    view::{self, books::BookValues, form::FieldErrors},
};

use super::BookForm;

const HEADING: &str = "Add a book";
const ACTION: &str = "/books";

pub async fn add_book_page(CurrentUser(user): CurrentUser) -> Html<String> {
    view::books::book_page(
        HEADING,
        ACTION,
        &user,
        BookValues::default(),
        &FieldErrors::default(),
        None,
    )
}

/// Adds a book owned by the current user.
#[tracing::instrument(skip_all)]
pub async fn add_book(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    ApiForm(form): ApiForm<BookForm>,
) -> Result<Response, ApiError> {
    if let Err(errors) = form.validate() {
        tracing::debug!(?errors, "Invalid book form");

        let page = view::books::book_page(
            HEADING,
            ACTION,
            &user,
            form.values(false),
            &FieldErrors::from(&errors),
            None,
        );

        return Ok(page.into_response());
    }

    let mut tx = state.store().begin().await.map_err(server_error!(state))?;

    let id = Book::insert(&mut *tx, form.fields(), user.id)
        .await
        .map_err(server_error!(state))?;

    tx.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, owner = user.id, "Book added");

    Ok(Redirect::to("/").into_response())
}
