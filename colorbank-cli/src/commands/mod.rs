//! Command implementations for the colorbank CLI

pub mod import;
pub mod list;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use import::run_import;
pub use list::run_list;
pub use serve::run_serve;

use anyhow::{Context, Result};
use clap::Args;
use colorbank_server::{CommitMode, ServiceConfig};
use colorbank_server::db::{create_pool, migrate, SqlitePool};

/// Options shared by every command that touches the store
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Database URL (overrides DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Directory uploads are staged in (overrides COLORBANK_UPLOAD_DIR)
    #[arg(long)]
    pub upload_dir: Option<std::path::PathBuf>,

    /// Colors per page (overrides COLORBANK_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// per-row or atomic (overrides COLORBANK_COMMIT_MODE)
    #[arg(long)]
    pub commit_mode: Option<CommitMode>,
}

impl StoreArgs {
    /// Environment config with command-line overrides applied
    pub fn service_config(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::from_env().context("invalid configuration")?;

        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        if let Some(dir) = &self.upload_dir {
            config.upload_dir = dir.clone();
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(mode) = self.commit_mode {
            config.commit_mode = mode;
        }

        config.validated().context("invalid configuration")
    }
}

/// Open the configured store and make sure its schema exists
pub async fn open_store(config: &ServiceConfig) -> Result<SqlitePool> {
    let pool = create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    migrate(&pool).await.context("Failed to run migrations")?;
    Ok(pool)
}
