//! Color repository
//!
//! The repository borrows a single connection, usually a transaction, so a
//! sequence of calls shares one boundary:
//! - insert_new: existence check + INSERT, primary key as backstop
//! - count + page: consistent snapshot when run on one transaction

use sqlx::SqliteConnection;

use crate::models::{Color, Pagination};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("color {id} already exists")]
    Duplicate { id: i64 },
}

/// Color repository over one connection
pub struct ColorRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ColorRepo<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Whether a color with this id is stored.
    pub async fn exists(&mut self, id: i64) -> Result<bool, DbError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM colors WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(found.is_some())
    }

    /// Get a single color by id.
    #[cfg(test)]
    pub async fn get(&mut self, id: i64) -> Result<Option<Color>, DbError> {
        let color = sqlx::query_as::<_, Color>(
            "SELECT id, name, hex, red, green, blue, decimal FROM colors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(color)
    }

    /// Insert a color whose id must not exist yet.
    ///
    /// The explicit check reports the common case; a concurrent writer that
    /// commits between check and insert trips the primary key instead, and
    /// both surface as [`DbError::Duplicate`].
    pub async fn insert_new(&mut self, color: &Color) -> Result<(), DbError> {
        if self.exists(color.id).await? {
            return Err(DbError::Duplicate { id: color.id });
        }

        sqlx::query(
            r#"
            INSERT INTO colors (id, name, hex, red, green, blue, decimal)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(color.id)
        .bind(&color.name)
        .bind(&color.hex)
        .bind(color.red)
        .bind(color.green)
        .bind(color.blue)
        .bind(color.decimal)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DbError::Duplicate { id: color.id }
            }
            e => DbError::Sqlx(e),
        })?;

        Ok(())
    }

    /// Total number of stored colors.
    pub async fn count(&mut self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM colors")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// One page of colors in ascending id order.
    pub async fn page(&mut self, page: Pagination) -> Result<Vec<Color>, DbError> {
        let colors = sqlx::query_as::<_, Color>(
            r#"
            SELECT id, name, hex, red, green, blue, decimal
            FROM colors
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(colors)
    }
}
