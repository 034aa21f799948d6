//! Field validators shared by the forms.

use std::borrow::Cow;

use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));

    error
}

/// Rejects empty and whitespace only values.
pub fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required"));
    }

    Ok(())
}

/// Accepts an empty value or an integer.
pub fn optional_integer(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() || value.parse::<i64>().is_ok() {
        return Ok(());
    }

    Err(error("integer", "Not a valid integer value"))
}
