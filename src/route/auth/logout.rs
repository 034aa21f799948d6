use axum::response::Redirect;
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{extractor::current_user::CurrentUser, session};

/// Ends the session. Only reachable with a session.
pub async fn logout(
    CurrentUser(user): CurrentUser,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    tracing::info!(user_id = user.id, "Logged out");

    (session::end(jar), Redirect::to("/"))
}
