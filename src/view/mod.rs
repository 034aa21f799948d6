//! Server side rendered HTML pages.

use axum::response::Html;

use crate::store::User;

pub mod auth;
pub mod books;
pub mod catalog;
pub mod error;
pub mod form;

/// Escapes text for use inside HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// Wraps `content` into the page skeleton with the navigation bar.
///
/// `content` must already be escaped.
pub fn layout(title: &str, user: Option<&User>, content: &str) -> Html<String> {
    let nav = match user {
        Some(user) => format!(
            r#"<span class="user">{} {}</span> <a href="/books">Add a book</a> <a href="/logout">Log out</a>"#,
            escape(&user.name),
            escape(&user.surname),
        ),
        None => r#"<a href="/register">Register</a> <a href="/login">Log in</a>"#.to_string(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Library</a> {nav}</nav>
<main>
<h1>{title}</h1>
{content}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}
