//! colorbank-server: color CSV ingestion and paginated reads over HTTP
//!
//! Uploads are `;`-separated rows `id;name;hex;red;green;blue;decimal`,
//! validated row by row and stored in SQLite. Stored colors are served in
//! fixed-size pages ordered by id.

pub mod config;
pub mod db;
pub mod http;
pub mod ingest;
pub mod models;
pub mod read;

pub use config::{CommitMode, ConfigError, ServiceConfig};
pub use ingest::{IngestError, IngestReport, Ingestor};
pub use models::Color;
pub use read::{PageReader, ReadError, StoreSummary};
