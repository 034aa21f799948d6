use axum::{extract::State, response::Redirect};

use crate::{
    error::{ApiError, NotFoundError},
    extractor::{current_user::CurrentUser, path::ApiPath},
    server_error,
    state::ApiState,
    store::Book,
    traits::StateProvider,
};

/// Deletes a book of the current user.
///
/// Books of other users are answered as not found and left intact.
#[tracing::instrument(skip_all)]
pub async fn delete_book(
    State(state): State<ApiState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Redirect, ApiError> {
    let mut tx = state.store().begin().await.map_err(server_error!(state))?;

    let deleted = Book::delete_owned(&mut *tx, id, user.id)
        .await
        .map_err(server_error!(state))?;

    if !deleted {
        tracing::warn!(id, user_id = user.id, "Book not found or not owned");

        return Err(NotFoundError::new(state.error_verbosity()).into());
    }

    tx.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, user_id = user.id, "Book deleted");

    Ok(Redirect::to("/"))
}
