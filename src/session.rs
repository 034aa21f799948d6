//! Browser sessions.
//!
//! The session is a private cookie holding the user id. The cookie is
//! encrypted and authenticated with the server's key, so its content can
//! neither be read nor forged by the client.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

pub const SESSION_COOKIE: &str = "library_session";

/// Lifetime of a remembered session.
const REMEMBER_FOR: time::Duration = time::Duration::days(365);

/// Starts a session for `user_id`.
///
/// Without `remember` the cookie ends with the browser session.
pub fn start(jar: PrivateCookieJar, user_id: i64, remember: bool) -> PrivateCookieJar {
    let mut cookie = Cookie::build((SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    if remember {
        cookie = cookie.max_age(REMEMBER_FOR);
    }

    jar.add(cookie)
}

/// Ends the session, whether or not there is one.
pub fn end(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// The user id of the session, if the cookie is present and intact.
pub fn user_id(jar: &PrivateCookieJar) -> Option<i64> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Key;

    use super::*;

    #[test]
    fn remembered_session_is_persistent() {
        let jar = start(PrivateCookieJar::new(Key::generate()), 7, true);

        assert_eq!(user_id(&jar), Some(7));
        assert_eq!(
            jar.get(SESSION_COOKIE).and_then(|cookie| cookie.max_age()),
            Some(REMEMBER_FOR)
        );
    }

    #[test]
    fn plain_session_ends_with_the_browser() {
        let jar = start(PrivateCookieJar::new(Key::generate()), 7, false);

        assert_eq!(user_id(&jar), Some(7));
        assert!(jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.max_age())
            .is_none());
    }

    #[test]
    fn ended_session_has_no_user() {
        let jar = start(PrivateCookieJar::new(Key::generate()), 7, true);
        let jar = end(jar);

        assert_eq!(user_id(&jar), None);
    }
}
