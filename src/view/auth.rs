use axum::response::Html;

use crate::store::User;

use super::{
    form::{self, FieldErrors, InputKind},
    layout,
};

/// Values echoed back into the registration form. Passwords are never echoed.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterValues<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub surname: &'a str,
}

pub fn register_page(
    user: Option<&User>,
    values: RegisterValues<'_>,
    errors: &FieldErrors,
    message: Option<&str>,
) -> Html<String> {
    let fields = [
        form::message(message),
        form::input("Email", "email", InputKind::Email, values.email, errors),
        form::input("Password", "password", InputKind::Password, "", errors),
        form::input(
            "Repeat password",
            "password_again",
            InputKind::Password,
            "",
            errors,
        ),
        form::input("Name", "name", InputKind::Text, values.name, errors),
        form::input("Surname", "surname", InputKind::Text, values.surname, errors),
    ]
    .concat();

    layout(
        "Registration",
        user,
        &form::form("/register", &fields, "Register"),
    )
}

pub fn login_page(
    user: Option<&User>,
    email: &str,
    remember_me: bool,
    errors: &FieldErrors,
    message: Option<&str>,
) -> Html<String> {
    let fields = [
        form::message(message),
        form::input("Email", "email", InputKind::Email, email, errors),
        form::input("Password", "password", InputKind::Password, "", errors),
        form::checkbox("Remember me", "remember_me", remember_me),
    ]
    .concat();

    layout("Log in", user, &form::form("/login", &fields, "Log in"))
}
