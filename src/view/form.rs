//! Building blocks for the HTML forms.

use std::collections::BTreeMap;

use validator::ValidationErrors;

use super::escape;

/// Per field validation messages.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => error.code.to_string(),
                    })
                    .collect();

                (field.to_string(), messages)
            })
            .collect();

        FieldErrors(fields)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum InputKind {
    Text,
    Email,
    Password,
    Number,
}

impl InputKind {
    fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Password => "password",
            InputKind::Number => "number",
        }
    }
}

pub fn input(label: &str, name: &str, kind: InputKind, value: &str, errors: &FieldErrors) -> String {
    let errors: String = errors
        .get(name)
        .iter()
        .map(|error| format!(r#" <span class="error">{}</span>"#, escape(error)))
        .collect();

    format!(
        r#"<p><label for="{name}">{label}</label><br><input type="{kind}" id="{name}" name="{name}" value="{value}">{errors}</p>"#,
        name = escape(name),
        label = escape(label),
        kind = kind.as_str(),
        value = escape(value),
    )
}

/// A checkbox submitting `true` when checked and nothing otherwise.
pub fn checkbox(label: &str, name: &str, checked: bool) -> String {
    format!(
        r#"<p><input type="checkbox" id="{name}" name="{name}" value="true"{checked}> <label for="{name}">{label}</label></p>"#,
        name = escape(name),
        label = escape(label),
        checked = if checked { " checked" } else { "" },
    )
}

/// Form level message, e.g. a failed login.
pub fn message(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(r#"<div class="alert">{}</div>"#, escape(message)),
        None => String::new(),
    }
}

/// Wraps already rendered fields into a form posting back to `action`.
pub fn form(action: &str, fields: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{action}" novalidate>
{fields}
<p><button type="submit">{submit}</button></p>
</form>"#,
        action = escape(action),
        submit = escape(submit),
    )
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Title {
        #[validate(length(min = 1, message = "This field is required"))]
        title: String,
    }

    #[test]
    fn collects_messages_per_field() {
        let errors = Title {
            title: String::new(),
        }
        .validate()
        .unwrap_err();

        let errors = FieldErrors::from(&errors);

        assert_eq!(errors.get("title"), ["This field is required"]);
        assert!(errors.get("author").is_empty());
    }

    #[test]
    fn input_renders_value_and_errors() {
        let errors = FieldErrors::from(
            &Title {
                title: String::new(),
            }
            .validate()
            .unwrap_err(),
        );

        let html = input("Title", "title", InputKind::Text, "<Dune>", &errors);

        assert!(html.contains(r#"value="&lt;Dune&gt;""#));
        assert!(html.contains("This field is required"));
    }
}
