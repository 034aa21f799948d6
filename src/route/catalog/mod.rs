pub mod app;
pub mod index;
