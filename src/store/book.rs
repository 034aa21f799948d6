use sqlx::{Executor, FromRow, Sqlite};

use super::{map_constraint_violation, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub user_id: Option<i64>,
}

/// The user editable fields of a book.
#[derive(Debug, Clone, Copy)]
pub struct BookFields<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub genre: Option<&'a str>,
}

impl Book {
    #[tracing::instrument(skip_all)]
    pub async fn all<'e, E>(executor: E) -> Result<Vec<Book>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, genre, user_id FROM books ORDER BY id",
        )
        .fetch_all(executor)
        .await?;

        Ok(books)
    }

    #[tracing::instrument(skip(executor))]
    pub async fn owned_by<'e, E>(executor: E, user_id: i64) -> Result<Vec<Book>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, genre, user_id FROM books WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(books)
    }

    /// Books owned by someone else or by nobody.
    #[tracing::instrument(skip(executor))]
    pub async fn not_owned_by<'e, E>(executor: E, user_id: i64) -> Result<Vec<Book>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, genre, user_id FROM books WHERE user_id IS NOT ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(books)
    }

    #[tracing::instrument(skip(executor))]
    pub async fn find<'e, E>(executor: E, id: i64) -> Result<Option<Book>, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, genre, user_id FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(book)
    }

    /// Inserts a book owned by `owner` and returns its id.
    #[tracing::instrument(skip(executor))]
    pub async fn insert<'e, E>(
        executor: E,
        fields: BookFields<'_>,
        owner: i64,
    ) -> Result<i64, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("INSERT INTO books (title, author, genre, user_id) VALUES (?, ?, ?, ?)")
                .bind(fields.title)
                .bind(fields.author)
                .bind(fields.genre)
                .bind(owner)
                .execute(executor)
                .await
                .map_err(map_constraint_violation)?;

        let id = result.last_insert_rowid();

        tracing::debug!(id, "Inserted");

        Ok(id)
    }

    /// Overwrites the fields and the owner of a book. Returns `false` if there is no such book.
    ///
    /// Fails with [`StoreError::UnknownOwner`] if `owner` does not reference a user.
    #[tracing::instrument(skip(executor))]
    pub async fn update<'e, E>(
        executor: E,
        id: i64,
        fields: BookFields<'_>,
        owner: Option<i64>,
    ) -> Result<bool, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE books SET title = ?, author = ?, genre = ?, user_id = ? WHERE id = ?",
        )
        .bind(fields.title)
        .bind(fields.author)
        .bind(fields.genre)
        .bind(owner)
        .bind(id)
        .execute(executor)
        .await
        .map_err(map_constraint_violation)?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the book only if it is owned by `owner`. Returns `false` if nothing was deleted.
    #[tracing::instrument(skip(executor))]
    pub async fn delete_owned<'e, E>(executor: E, id: i64, owner: i64) -> Result<bool, StoreError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM books WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
