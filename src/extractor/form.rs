use axum::{
    async_trait,
    extract::{Form as AxumForm, FromRequest, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    error::{ApiError, BodyError, InternalServerError},
    traits::StateProvider,
};

/// A Wrapper around [`axum::extract::Form`] that rejects with an [`ApiError`].
///
/// Extracts an url encoded form from the request body consuming the request.
/// Field validation is left to the handler, which re-renders the form on failure.
pub struct ApiForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiForm<T>
where
    T: DeserializeOwned + JsonSchema + Debug + Send,
    S: Send + Sync + StateProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "form_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let form = AxumForm::<T>::from_request(req, state).await;

        match form {
            Ok(form) => {
                tracing::trace!(form=?form.0, "Extracted");

                Ok(ApiForm(form.0))
            }
            Err(form_rejection) => {
                tracing::warn!(rejection=?form_rejection, "Rejection");

                let verbosity = state.error_verbosity();

                let body_error_reason = form_rejection.body_text();

                let body_expected_schema = serde_yaml::to_string(&schema_for!(T))
                    .map_err(|err| InternalServerError::from_generic_error(verbosity, err))?;

                Err(BodyError::new(verbosity, body_error_reason, body_expected_schema).into())
            }
        }
    }
}
