use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};

use crate::{
    error::{ApiError, InternalServerError, UnauthenticatedError},
    session,
    store::User,
    traits::StateProvider,
};

/// Extracts the user behind the session cookie.
///
/// Rejects with a redirect to the login page if there is no valid session
/// or the session refers to a user that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync + StateProvider,
    Key: FromRef<S>,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "current_user_extractor", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verbosity = state.error_verbosity();

        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|never: Infallible| -> ApiError { match never {} })?;

        let user_id = session::user_id(&jar).ok_or_else(|| {
            tracing::warn!("Rejection. No valid session");

            UnauthenticatedError::new(verbosity)
        })?;

        let user = User::find_by_id(state.store().pool(), user_id)
            .await
            .map_err(|err| InternalServerError::from_generic_error(verbosity, err))?
            .ok_or_else(|| {
                tracing::warn!(user_id, "Rejection. Session user does not exist");

                UnauthenticatedError::new(verbosity)
            })?;

        tracing::trace!(?user, "Extracted");

        Ok(CurrentUser(user))
    }
}
