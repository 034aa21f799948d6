use crate::{error::ErrorVerbosity, password::PasswordHasher, store::Store};

pub trait StateProvider {
    /// Returns the error verbosity.
    fn error_verbosity(&self) -> ErrorVerbosity;

    /// Returns the store handle shared by all requests.
    fn store(&self) -> &Store;

    /// Returns the password hasher.
    fn password_hasher(&self) -> &PasswordHasher;
}
