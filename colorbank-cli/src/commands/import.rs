//! Import command - run a local file through the upload pipeline
//!
//! The file is staged, validated and stored exactly like an HTTP upload,
//! so the same filename, column and duplicate rules apply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colorbank_server::{IngestError, Ingestor};
use futures::{stream, Stream};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::{open_store, StoreArgs};

/// Arguments for the import command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Color file (`id;name;hex;red;green;blue;decimal` per line, `.csv`)
    pub path: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn run_import(args: ImportArgs) -> Result<()> {
    let service = args.store.service_config()?;
    let pool = open_store(&service).await?;
    let ingestor = Ingestor::new(pool.clone(), &service);

    let filename = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = File::open(&args.path)
        .await
        .with_context(|| format!("Failed to open {}", args.path.display()))?;

    let outcome = ingestor.ingest(&filename, chunks(file)).await;
    pool.close().await;

    match outcome {
        Ok(report) => {
            println!("Stored {} colors from {}", report.rows, args.path.display());
            Ok(())
        }
        Err(e) => Err(describe(e, ingestor.commit_mode())),
    }
}

const CHUNK_SIZE: usize = 64 * 1024;

/// Read `file` in fixed-size chunks until EOF.
fn chunks(file: File) -> impl Stream<Item = std::io::Result<Vec<u8>>> {
    stream::unfold(Some(file), |file| async move {
        let mut file = file?;
        let mut buf = vec![0; CHUNK_SIZE];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(buf), Some(file)))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
}

fn describe(e: IngestError, mode: colorbank_server::CommitMode) -> anyhow::Error {
    match e.row() {
        Some(row) => anyhow::anyhow!("{} (upload stopped at row {}, commit mode {})", e, row, mode),
        None => anyhow::Error::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::io::Write;

    #[tokio::test]
    async fn chunks_cover_whole_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let content: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        tmp.write_all(&content).unwrap();

        let file = File::open(tmp.path()).await.unwrap();
        let parts: Vec<Vec<u8>> = chunks(file).try_collect().await.unwrap();

        assert!(parts.len() >= 3);
        assert!(parts.iter().all(|p| p.len() <= CHUNK_SIZE));
        assert_eq!(parts.concat(), content);
    }
}
