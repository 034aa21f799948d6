use std::fmt;

use derivative::Derivative;
use sqlx::{Executor, FromRow, Sqlite};

use crate::utils::mask_fmt;

use super::{map_constraint_violation, StoreError};

#[derive(Derivative, Clone, FromRow)]
#[derivative(Debug)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub hashed_password: String,
}

/// A user about to be registered. The password is already hashed.
pub struct NewUser<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub hashed_password: String,
}

impl fmt::Debug for NewUser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("hashed_password", &"...")
            .finish()
    }
}

impl User {
    /// Identity with no personal shelf on the catalog page.
    pub const ADMIN_ID: i64 = 1;

    pub fn is_admin(&self) -> bool {
        self.id == Self::ADMIN_ID
    }

    #[tracing::instrument(skip(executor))]
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<User>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, surname, email, hashed_password FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(executor))]
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, surname, email, hashed_password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Inserts the user and returns its id.
    ///
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    #[tracing::instrument(skip(executor))]
    pub async fn insert<'e, E>(executor: E, new_user: &NewUser<'_>) -> Result<i64, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT INTO users (name, surname, email, hashed_password) VALUES (?, ?, ?, ?)",
        )
        .bind(new_user.name)
        .bind(new_user.surname)
        .bind(new_user.email)
        .bind(&new_user.hashed_password)
        .execute(executor)
        .await
        .map_err(map_constraint_violation)?;

        let id = result.last_insert_rowid();

        tracing::debug!(id, "Inserted");

        Ok(id)
    }
}
