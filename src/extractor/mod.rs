pub mod current_user;
pub mod form;
pub mod optional;
pub mod path;
