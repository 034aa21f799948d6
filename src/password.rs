//! Salted password hashing.
//!
//! Hashing is CPU bound, so both operations run on the blocking thread pool.

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(#[source] bcrypt::BcryptError),
    #[error("Failed to verify password: {0}")]
    Verify(#[source] bcrypt::BcryptError),
    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[tracing::instrument(skip_all)]
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let cost = self.cost;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await?
            .map_err(PasswordError::Hash)
    }

    /// Checks `password` against a stored hash.
    ///
    /// A malformed stored hash is an error, a mismatch is `Ok(false)`.
    #[tracing::instrument(skip_all)]
    pub async fn verify(&self, password: &str, hashed: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed))
            .await?
            .map_err(PasswordError::Verify)
    }
}
