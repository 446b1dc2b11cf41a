//! List command - print one page of stored colors

use anyhow::{Context, Result};
use clap::Parser;
use colorbank_server::{PageReader, ReadError};

use super::{open_store, StoreArgs};

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Page number (1-indexed)
    #[arg(long, short = 'p', default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_list(args: ListArgs) -> Result<()> {
    let service = args.store.service_config()?;
    let pool = open_store(&service).await?;
    let reader = PageReader::new(pool.clone(), &service);

    let outcome = reader.read(args.page).await;
    pool.close().await;

    let colors = match outcome {
        Ok(colors) => colors,
        Err(ReadError::PageOutOfBounds { page, pages }) => {
            anyhow::bail!("Page {} out of bounds ({} pages, {} colors per page)", page, pages, reader.page_size())
        }
        Err(e) => return Err(e).context("Failed to read colors"),
    };

    println!("{}", serde_json::to_string_pretty(&colors)?);
    Ok(())
}
