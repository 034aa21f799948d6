use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use validator::Validate;

use crate::{
    error::{ApiError, NotFoundError},
    extractor::{current_user::CurrentUser, form::ApiForm, path::ApiPath},
    server_error,
    state::ApiState,
    store::{Book, StoreError, User},
    traits::StateProvider,
    view::{self, books::BookValues, form::FieldErrors},
};

use super::BookForm;

const HEADING: &str = "Edit a book";

pub const UNKNOWN_OWNER: &str = "No user with this id";

fn action(id: i64) -> String {
    format!("/books/{id}")
}

/// Shows the book form filled with the stored values.
pub async fn edit_book_page(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Html<String>, ApiError> {
    let book = Book::find(state.store().pool(), id)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| {
            tracing::warn!(id, "Book not found");

            NotFoundError::new(state.error_verbosity())
        })?;

    let owner = book.user_id.map(|id| id.to_string()).unwrap_or_default();

    let values = BookValues {
        title: &book.title,
        author: book.author.as_deref().unwrap_or_default(),
        genre: book.genre.as_deref().unwrap_or_default(),
        user_id: Some(owner.as_str()),
    };

    Ok(view::books::book_page(
        HEADING,
        &action(id),
        &user,
        values,
        &FieldErrors::default(),
        None,
    ))
}

/// Overwrites a book, including its owner.
///
/// Any authenticated user may edit any book; ownership is only checked on delete.
#[tracing::instrument(skip_all)]
pub async fn edit_book(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiForm(form): ApiForm<BookForm>,
) -> Result<Response, ApiError> {
    let action = action(id);
    let render = |errors: &FieldErrors, message: Option<&str>| {
        view::books::book_page(HEADING, &action, &user, form.values(true), errors, message)
            .into_response()
    };

    let mut tx = state.store().begin().await.map_err(server_error!(state))?;

    let book = Book::find(&mut *tx, id)
        .await
        .map_err(server_error!(state))?
        .ok_or_else(|| {
            tracing::warn!(id, "Book not found");

            NotFoundError::new(state.error_verbosity())
        })?;

    if let Err(errors) = form.validate() {
        tracing::debug!(?errors, "Invalid book form");

        return Ok(render(&FieldErrors::from(&errors), None));
    }

    let owner = form.owner_id();

    if let Some(owner) = owner {
        let exists = User::find_by_id(&mut *tx, owner)
            .await
            .map_err(server_error!(state))?
            .is_some();

        if !exists {
            tracing::debug!(owner, "Unknown owner");

            return Ok(render(&FieldErrors::default(), Some(UNKNOWN_OWNER)));
        }
    }

    tracing::debug!(id, previous_owner = ?book.user_id, editor = user.id, "Editing");

    let updated = Book::update(&mut *tx, id, form.fields(), owner).await;

    if let Err(StoreError::UnknownOwner) = updated {
        return Ok(render(&FieldErrors::default(), Some(UNKNOWN_OWNER)));
    }

    updated.map_err(server_error!(state))?;

    tx.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, ?owner, "Book updated");

    Ok(Redirect::to("/").into_response())
}
