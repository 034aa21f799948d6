use axum::{extract::Request, http::Response, middleware::Next, response::IntoResponse};

/// Middleware to trace request and response headers.
///
/// Cookie headers carry the encrypted session and are left out.
pub async fn trace_headers(req: Request, next: Next) -> impl IntoResponse {
    let incoming_headers: Vec<_> = req
        .headers()
        .iter()
        .filter(|(name, _)| *name != axum::http::header::COOKIE)
        .collect();
    tracing::trace!(?incoming_headers, "Headers");

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let outgoing_headers: Vec<_> = parts
        .headers
        .iter()
        .filter(|(name, _)| *name != axum::http::header::SET_COOKIE)
        .collect();
    tracing::trace!(?outgoing_headers, "Headers");

    Response::from_parts(parts, body)
}
