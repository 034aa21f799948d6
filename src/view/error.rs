use axum::{http::StatusCode, response::Html};

use super::{escape, layout};

pub fn error_page(status_code: StatusCode, message: &str, details: Option<&str>) -> Html<String> {
    let mut content = format!("<p>{}</p>", escape(message));

    if let Some(details) = details {
        content.push_str(&format!("<pre>{}</pre>", escape(details)));
    }

    content.push_str(r#"<p><a href="/">Back to the library</a></p>"#);

    layout(&status_code.to_string(), None, &content)
}
