pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
pub mod password;
mod route;
pub mod server;
mod session;
mod state;
pub mod store;
mod traits;
mod utils;
mod validation;
mod view;

#[cfg(test)]
mod test;
