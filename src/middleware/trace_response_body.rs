use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;

use crate::{
    error::{ApiError, InternalServerError},
    traits::StateProvider,
};

/// Pages and form errors are text. Anything else passes through unbuffered.
fn is_text(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("text/"))
}

/// Middleware to trace rendered pages.
///
/// Text bodies are buffered to be logged, so this is only cheap for small pages.
pub async fn trace_response_body<S: StateProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let path = req.uri().path().to_owned();
    let res = next.run(req).await;

    if !is_text(res.headers()) {
        tracing::trace!(%path, status = %res.status(), "Response body skipped");

        return Ok(res);
    }

    let (parts, body) = res.into_parts();
    let bytes = body
        .collect()
        .await
        .map_err(|err| InternalServerError::from_generic_error(state.error_verbosity(), err))?
        .to_bytes();

    match std::str::from_utf8(&bytes) {
        Ok(page) => tracing::trace!(%path, status = %parts.status, %page, "Response body"),
        Err(_) => tracing::trace!(%path, len = bytes.len(), "Response body is not utf-8"),
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
