//! Relational store for users and their books.
//!
//! The [`Store`] is created once at startup and shared by all requests.
//! Each request borrows a pooled connection for reads and opens a
//! transaction via [`Store::begin`] for writes.

use std::{path::PathBuf, str::FromStr};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor, Sqlite, SqlitePool, Transaction,
};

pub mod book;
pub mod schema;
pub mod user;

pub use book::{Book, BookFields};
pub use user::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid database url: {0}")]
    Url(#[source] sqlx::Error),
    #[error("Failed to create database directory {path:?}: {err}")]
    CreateDir {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("Failed to apply schema: {0}")]
    Schema(#[source] sqlx::Error),
    #[error("A user with this email already exists")]
    DuplicateEmail,
    #[error("Book owner does not reference an existing user")]
    UnknownOwner,
    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens the database file behind `database_url`, creating it and its directory if missing.
    #[tracing::instrument(skip_all, fields(%database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(StoreError::Url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let filename = options.clone().get_filename();

        if let Some(dir) = filename
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|err| StoreError::CreateDir {
                    path: dir.to_path_buf(),
                    err,
                })?;
        }

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        tracing::debug!("Connected");

        Self::from_pool(pool).await
    }

    /// A private in-memory database living as long as the store.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::Url)?
            .foreign_keys(true);

        // Every connection gets its own memory database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        pool.execute(schema::SQLITE_INIT)
            .await
            .map_err(StoreError::Schema)?;

        tracing::debug!("Schema applied");

        Ok(Self { pool })
    }

    /// The pool to run single reads against.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a transaction. It is rolled back on drop unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        Ok(self.pool.begin().await?)
    }
}

fn map_constraint_violation(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateEmail
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            StoreError::UnknownOwner
        }
        err => StoreError::Query(err),
    }
}
