use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use derivative::Derivative;
use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::ApiError,
    extractor::{current_user::CurrentUser, form::ApiForm, optional::Optional},
    server_error,
    state::ApiState,
    store::{NewUser, StoreError, User},
    traits::StateProvider,
    utils::mask_fmt,
    validation::required,
    view::{
        self,
        auth::RegisterValues,
        form::FieldErrors,
    },
};

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";

#[derive(Derivative, Deserialize, Validate, JsonSchema)]
#[derivative(Debug)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub password_again: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub surname: String,
}

impl RegisterForm {
    fn values(&self) -> RegisterValues<'_> {
        RegisterValues {
            email: &self.email,
            name: &self.name,
            surname: &self.surname,
        }
    }
}

pub async fn register_page(Optional(current_user): Optional<CurrentUser>) -> Html<String> {
    let user = current_user.map(|CurrentUser(user)| user);

    view::auth::register_page(
        user.as_ref(),
        RegisterValues::default(),
        &FieldErrors::default(),
        None,
    )
}

/// Registers a new user and sends them to the login page.
///
/// Invalid input re-renders the form and leaves the store untouched.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<ApiState>,
    ApiForm(form): ApiForm<RegisterForm>,
) -> Result<Response, ApiError> {
    let render = |errors: &FieldErrors, message: Option<&str>| {
        view::auth::register_page(None, form.values(), errors, message).into_response()
    };

    if let Err(errors) = form.validate() {
        tracing::debug!(?errors, "Invalid registration form");

        return Ok(render(&FieldErrors::from(&errors), None));
    }

    if form.password != form.password_again {
        tracing::debug!("Passwords do not match");

        return Ok(render(&FieldErrors::default(), Some(PASSWORDS_DO_NOT_MATCH)));
    }

    let email = form.email.trim();

    let existing = User::find_by_email(state.store().pool(), email)
        .await
        .map_err(server_error!(state))?;

    if existing.is_some() {
        tracing::debug!(%email, "Email already registered");

        return Ok(render(&FieldErrors::default(), Some(USER_ALREADY_EXISTS)));
    }

    let hashed_password = state
        .password_hasher()
        .hash(&form.password)
        .await
        .map_err(server_error!(state))?;

    let new_user = NewUser {
        name: form.name.trim(),
        surname: form.surname.trim(),
        email,
        hashed_password,
    };

    let mut tx = state.store().begin().await.map_err(server_error!(state))?;

    let inserted = User::insert(&mut *tx, &new_user).await;

    // Lost a race against a concurrent registration of the same email.
    if let Err(StoreError::DuplicateEmail) = inserted {
        tracing::debug!(%email, "Email already registered");

        return Ok(render(&FieldErrors::default(), Some(USER_ALREADY_EXISTS)));
    }

    let id = inserted.map_err(server_error!(state))?;

    tx.commit().await.map_err(server_error!(state))?;

    tracing::info!(id, "Registered");

    Ok(Redirect::to("/login").into_response())
}
