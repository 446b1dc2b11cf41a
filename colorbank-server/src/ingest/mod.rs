//! Ingestion pipeline - upload → stage → validate → store
//!
//! Rows are processed strictly in file order. Each row is checked for
//! arity, then type coercion, then a duplicate id, and the first failing
//! row stops the upload. What stays committed on failure depends on the
//! configured [`CommitMode`].

pub mod reader;
pub mod stage;

use std::path::Path;
use std::sync::Arc;

use futures::Stream;
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{CommitMode, ServiceConfig};
use crate::db::{ColorRepo, DbError};
use crate::models::{Color, RowError};

pub use reader::{MalformedRow, Row, RowReader};
pub use stage::{BlobStage, StageError, StagedFile};

/// Ingestion error. Row-level variants carry the 1-based failing line.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid file format: '{filename}'")]
    InvalidFileFormat { filename: String },

    #[error("row {row}: expected {expected} columns, found {found}")]
    StructuralMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    TypeCoercion {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: color {id} already exists")]
    DuplicateKey { row: usize, id: i64 },

    #[error("row {row}: malformed record: {source}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Stage(#[from] StageError),

    #[error("staged upload unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(DbError),
}

impl IngestError {
    /// Line of the row that stopped the upload, if a row did.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::StructuralMismatch { row, .. }
            | Self::TypeCoercion { row, .. }
            | Self::DuplicateKey { row, .. }
            | Self::Malformed { row, .. } => Some(*row),
            _ => None,
        }
    }

    fn at_row(row: usize, err: RowError) -> Self {
        match err {
            RowError::Arity { expected, found } => Self::StructuralMismatch {
                row,
                expected,
                found,
            },
            RowError::Coercion { column, value } => Self::TypeCoercion { row, column, value },
        }
    }
}

impl From<MalformedRow> for IngestError {
    fn from(e: MalformedRow) -> Self {
        Self::Malformed {
            row: e.row,
            source: e.source,
        }
    }
}

impl From<sqlx::Error> for IngestError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(DbError::Sqlx(e))
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows stored
    pub rows: usize,
}

/// Accept only non-empty names with a `.csv` extension (any case).
pub fn validate_filename(filename: &str) -> Result<(), IngestError> {
    let is_csv = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if filename.trim().is_empty() || !is_csv {
        return Err(IngestError::InvalidFileFormat {
            filename: filename.to_owned(),
        });
    }
    Ok(())
}

/// Runs uploads into the color store
#[derive(Clone)]
pub struct Ingestor {
    pool: SqlitePool,
    stage: BlobStage,
    commit_mode: CommitMode,
    /// Serializes uploads in this process; the primary key covers the rest.
    write_gate: Arc<Mutex<()>>,
}

impl Ingestor {
    pub fn new(pool: SqlitePool, config: &ServiceConfig) -> Self {
        Self {
            pool,
            stage: BlobStage::new(&config.upload_dir),
            commit_mode: config.commit_mode,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn commit_mode(&self) -> CommitMode {
        self.commit_mode
    }

    /// Stage `chunks` as `filename`, then validate and store every row.
    ///
    /// The staged copy is removed whatever the outcome.
    pub async fn ingest<S, B, E>(&self, filename: &str, chunks: S) -> Result<IngestReport, IngestError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::error::Error + Send + Sync + 'static,
    {
        validate_filename(filename)?;

        let staged = self.stage.stage(chunks).await?;
        debug!(filename, bytes = staged.len(), path = %staged.path().display(), "upload staged");

        let outcome = self.load(staged.path()).await;

        if let Err(e) = staged.close() {
            warn!(filename, error = %e, "failed to remove staged upload");
        }

        match &outcome {
            Ok(report) => info!(filename, rows = report.rows, mode = %self.commit_mode, "upload stored"),
            Err(e) => warn!(filename, row = ?e.row(), error = %e, "upload rejected"),
        }
        outcome
    }

    async fn load(&self, path: &Path) -> Result<IngestReport, IngestError> {
        let rows = RowReader::open(path)?;
        let _gate = self.write_gate.lock().await;

        match self.commit_mode {
            CommitMode::PerRow => self.load_per_row(rows).await,
            CommitMode::Atomic => self.load_atomic(rows).await,
        }
    }

    /// One transaction per row: earlier rows survive a later failure.
    async fn load_per_row<I>(&self, rows: I) -> Result<IngestReport, IngestError>
    where
        I: Iterator<Item = Result<Row, MalformedRow>>,
    {
        let mut stored = 0;
        for row in rows {
            let (line, color) = parse_row(row?)?;

            let mut tx = self.pool.begin().await?;
            store_row(&mut tx, line, &color).await?;
            tx.commit().await?;

            stored += 1;
        }
        Ok(IngestReport { rows: stored })
    }

    /// One transaction for the file: a failure rolls every row back.
    async fn load_atomic<I>(&self, rows: I) -> Result<IngestReport, IngestError>
    where
        I: Iterator<Item = Result<Row, MalformedRow>>,
    {
        let mut tx = self.pool.begin().await?;

        let mut stored = 0;
        for row in rows {
            let (line, color) = parse_row(row?)?;
            store_row(&mut tx, line, &color).await?;
            stored += 1;
        }

        tx.commit().await?;
        Ok(IngestReport { rows: stored })
    }
}

fn parse_row(row: Row) -> Result<(usize, Color), IngestError> {
    Color::from_columns(&row.columns)
        .map(|color| (row.number, color))
        .map_err(|e| IngestError::at_row(row.number, e))
}

async fn store_row(conn: &mut SqliteConnection, line: usize, color: &Color) -> Result<(), IngestError> {
    ColorRepo::new(conn)
        .insert_new(color)
        .await
        .map_err(|e| match e {
            DbError::Duplicate { id } => IngestError::DuplicateKey { row: line, id },
            e => IngestError::Database(e),
        })?;

    debug!(row = line, id = color.id, "row stored");
    Ok(())
}
