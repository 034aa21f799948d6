use axum::{extract::State, response::Html};

use crate::{
    error::ApiError,
    extractor::{current_user::CurrentUser, optional::Optional},
    server_error,
    state::ApiState,
    store::Book,
    traits::StateProvider,
    view,
};

/// Lists the books of the current user and everybody else's.
///
/// Anonymous visitors and the admin get an empty personal shelf and see every book.
pub async fn index(
    State(state): State<ApiState>,
    Optional(current_user): Optional<CurrentUser>,
) -> Result<Html<String>, ApiError> {
    let pool = state.store().pool();
    let user = current_user.map(|CurrentUser(user)| user);

    let (my_books, other_books) = match &user {
        Some(user) if !user.is_admin() => {
            let my_books = Book::owned_by(pool, user.id)
                .await
                .map_err(server_error!(state))?;
            let other_books = Book::not_owned_by(pool, user.id)
                .await
                .map_err(server_error!(state))?;

            (my_books, other_books)
        }
        _ => {
            let books = Book::all(pool).await.map_err(server_error!(state))?;

            (Vec::new(), books)
        }
    };

    Ok(view::catalog::index_page(
        user.as_ref(),
        &my_books,
        &other_books,
    ))
}
