use axum::{routing::get, Router};

use crate::state::ApiState;

/// Every route here requires a session.
pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/books",
            get(super::add_book::add_book_page).post(super::add_book::add_book),
        )
        .route(
            "/books/:id",
            get(super::edit_book::edit_book_page).post(super::edit_book::edit_book),
        )
        .route(
            "/books_delete/:id",
            get(super::delete_book::delete_book).post(super::delete_book::delete_book),
        )
}
