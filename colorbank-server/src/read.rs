//! Pagination reader - fixed-size pages over the stored colors

use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::ServiceConfig;
use crate::db::{ColorRepo, DbError};
use crate::models::{Color, Pagination};

/// Read error
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("page {page} out of bounds ({pages} pages)")]
    PageOutOfBounds { page: i64, pages: i64 },

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<sqlx::Error> for ReadError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(DbError::Sqlx(e))
    }
}

/// How many colors are stored and how they split into pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub colors: i64,
    pub pages: i64,
    pub page_size: u32,
}

/// Serves pages of a fixed size, ordered by ascending id
#[derive(Clone)]
pub struct PageReader {
    pool: SqlitePool,
    page_size: u32,
}

impl PageReader {
    pub fn new(pool: SqlitePool, config: &ServiceConfig) -> Self {
        Self {
            pool,
            page_size: config.page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Count the stored colors against the configured page size.
    pub async fn summary(&self) -> Result<StoreSummary, ReadError> {
        let mut conn = self.pool.acquire().await?;
        let colors = ColorRepo::new(&mut conn).count().await?;

        Ok(StoreSummary {
            colors,
            pages: Pagination::new(1, self.page_size).page_count(colors),
            page_size: self.page_size,
        })
    }

    /// Colors on 1-indexed `page`.
    ///
    /// Count and slice share one transaction so the bounds check matches the
    /// rows returned. With no colors stored there are no pages at all.
    pub async fn read(&self, page: i64) -> Result<Vec<Color>, ReadError> {
        let pagination = Pagination::new(page, self.page_size);

        let mut tx = self.pool.begin().await?;
        let mut repo = ColorRepo::new(&mut tx);

        let total = repo.count().await?;
        if !pagination.contains(total) {
            return Err(ReadError::PageOutOfBounds {
                page,
                pages: pagination.page_count(total),
            });
        }

        let colors = repo.page(pagination).await?;
        tx.commit().await?;

        tracing::debug!(page, total, returned = colors.len(), "page read");
        Ok(colors)
    }
}
