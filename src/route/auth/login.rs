use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use derivative::Derivative;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::ApiError,
    extractor::{current_user::CurrentUser, form::ApiForm, optional::Optional},
    server_error, session,
    state::ApiState,
    store::User,
    traits::StateProvider,
    utils::mask_fmt,
    validation::required,
    view::{self, form::FieldErrors},
};

/// Shown for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Derivative, Deserialize, Validate, JsonSchema)]
#[derivative(Debug)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

pub async fn login_page(Optional(current_user): Optional<CurrentUser>) -> Html<String> {
    let user = current_user.map(|CurrentUser(user)| user);

    view::auth::login_page(user.as_ref(), "", false, &FieldErrors::default(), None)
}

/// Starts a session if the credentials match and sends the user to the catalog.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<ApiState>,
    jar: PrivateCookieJar,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Response, ApiError> {
    let render = |errors: &FieldErrors, message: Option<&str>| {
        view::auth::login_page(None, &form.email, form.remember_me, errors, message)
            .into_response()
    };

    if let Err(errors) = form.validate() {
        tracing::debug!(?errors, "Invalid login form");

        return Ok(render(&FieldErrors::from(&errors), None));
    }

    let user = User::find_by_email(state.store().pool(), form.email.trim())
        .await
        .map_err(server_error!(state))?;

    let authenticated = match &user {
        Some(user) => state
            .password_hasher()
            .verify(&form.password, &user.hashed_password)
            .await
            .map_err(server_error!(state))?,
        None => false,
    };

    match user {
        Some(user) if authenticated => {
            tracing::info!(user_id = user.id, remember_me = form.remember_me, "Logged in");

            let jar = session::start(jar, user.id, form.remember_me);

            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => {
            tracing::warn!("Invalid credentials");

            Ok(render(&FieldErrors::default(), Some(INVALID_CREDENTIALS)))
        }
    }
}
