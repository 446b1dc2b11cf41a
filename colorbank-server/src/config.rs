//! Service configuration - paths, database and paging
//!
//! Configuration is loaded from environment variables:
//! - `COLORBANK_UPLOAD_DIR`: staging directory for uploads (default: ./uploads)
//! - `DATABASE_URL`: SQLite connection string (default: sqlite://csv_data.db)
//! - `COLORBANK_PAGE_SIZE`: colors per page (default: 4)
//! - `COLORBANK_COMMIT_MODE`: `per-row` or `atomic` (default: per-row)
//! - `COLORBANK_MAX_UPLOAD_BYTES`: upload body limit (default: 64 MiB)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 4;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://csv_data.db";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// How an upload's rows are committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Each row commits on its own; rows before a failing row stay stored.
    #[default]
    PerRow,
    /// The whole file is one transaction; any failure stores nothing.
    Atomic,
}

impl FromStr for CommitMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-row" | "per_row" | "row" => Ok(Self::PerRow),
            "atomic" | "file" => Ok(Self::Atomic),
            _ => Err(ConfigError::Invalid {
                var: "commit mode",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerRow => f.write_str("per-row"),
            Self::Atomic => f.write_str("atomic"),
        }
    }
}

/// Ingestion and read configuration, passed explicitly to each component
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory uploads are staged in before parsing
    pub upload_dir: PathBuf,
    pub database_url: String,
    /// Fixed number of colors per page
    pub page_size: u32,
    pub commit_mode: CommitMode,
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_size = match lookup("COLORBANK_PAGE_SIZE") {
            Some(v) => parse_var("COLORBANK_PAGE_SIZE", &v)?,
            None => defaults.page_size,
        };
        let commit_mode = match lookup("COLORBANK_COMMIT_MODE") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "COLORBANK_COMMIT_MODE",
                value: v,
            })?,
            None => defaults.commit_mode,
        };
        let max_upload_bytes = match lookup("COLORBANK_MAX_UPLOAD_BYTES") {
            Some(v) => parse_var("COLORBANK_MAX_UPLOAD_BYTES", &v)?,
            None => defaults.max_upload_bytes,
        };

        Self {
            upload_dir: lookup("COLORBANK_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            page_size,
            commit_mode,
            max_upload_bytes,
        }
        .validated()
    }

    /// Reject values no component can work with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(self)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            commit_mode: CommitMode::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.database_url, "sqlite://csv_data.db");
        assert_eq!(config.page_size, 4);
        assert_eq!(config.commit_mode, CommitMode::PerRow);
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("COLORBANK_UPLOAD_DIR", "/tmp/stage"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("COLORBANK_PAGE_SIZE", "10"),
            ("COLORBANK_COMMIT_MODE", "atomic"),
            ("COLORBANK_MAX_UPLOAD_BYTES", "1024"),
        ]))
        .unwrap();

        assert_eq!(config.upload_dir, PathBuf::from("/tmp/stage"));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.commit_mode, CommitMode::Atomic);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn rejects_garbage() {
        let err = ServiceConfig::from_lookup(lookup(&[("COLORBANK_PAGE_SIZE", "four")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "COLORBANK_PAGE_SIZE",
                ..
            }
        ));

        let err = ServiceConfig::from_lookup(lookup(&[("COLORBANK_COMMIT_MODE", "sometimes")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = ServiceConfig::from_lookup(lookup(&[("COLORBANK_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPageSize));
    }

    #[test]
    fn commit_mode_round_trips_through_display() {
        for mode in [CommitMode::PerRow, CommitMode::Atomic] {
            assert_eq!(mode.to_string().parse::<CommitMode>().unwrap(), mode);
        }
    }
}
