use std::{ops::Deref, sync::Arc};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{
    error::ErrorVerbosity, password::PasswordHasher, store::Store, traits::StateProvider,
};

#[derive(Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    pub fn new(
        error_verbosity: ErrorVerbosity,
        store: Store,
        password_hasher: PasswordHasher,
        cookie_key: Key,
    ) -> Self {
        Self {
            inner: Arc::new(ApiStateInner {
                error_verbosity,
                store,
                password_hasher,
                cookie_key,
            }),
        }
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct ApiStateInner {
    error_verbosity: ErrorVerbosity,
    store: Store,
    password_hasher: PasswordHasher,
    /// Encrypts and signs the session cookie.
    cookie_key: Key,
}

impl StateProvider for ApiState {
    fn error_verbosity(&self) -> ErrorVerbosity {
        self.error_verbosity
    }

    fn store(&self) -> &Store {
        &self.store
    }

    fn password_hasher(&self) -> &PasswordHasher {
        &self.password_hasher
    }
}

impl FromRef<ApiState> for Key {
    fn from_ref(state: &ApiState) -> Self {
        state.cookie_key.clone()
    }
}
