use axum::{routing::get, Router};

use crate::state::ApiState;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/register",
            get(super::register::register_page).post(super::register::register),
        )
        .route(
            "/login",
            get(super::login::login_page).post(super::login::login),
        )
        .route("/logout", get(super::logout::logout))
}
