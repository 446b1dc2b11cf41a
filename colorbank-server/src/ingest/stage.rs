//! Blob stage - uploads are streamed to a temporary file before parsing
//!
//! Every upload gets its own uniquely named file inside the stage
//! directory. The file is removed when the [`StagedFile`] drops, so every
//! exit path of the pipeline cleans up, panics included.

use std::io;
use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

/// Staging error
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The upload stream itself failed (client went away, bad multipart)
    #[error("upload interrupted: {0}")]
    Upload(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("staging failed: {0}")]
    Io(#[from] io::Error),
}

/// Temporary storage for uploads
#[derive(Debug, Clone)]
pub struct BlobStage {
    dir: PathBuf,
}

/// An upload on disk, deleted on drop
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    len: u64,
}

impl BlobStage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stream `chunks` into a fresh file in the stage directory.
    ///
    /// A failing chunk aborts staging and the partial file is removed.
    pub async fn stage<S, B, E>(&self, chunks: S) -> Result<StagedFile, StageError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::error::Error + Send + Sync + 'static,
    {
        tokio::fs::create_dir_all(&self.dir).await?;

        let (file, path) = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".csv")
            .tempfile_in(&self.dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut chunks = std::pin::pin!(chunks);
        let mut len = 0u64;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| StageError::Upload(Box::new(e)))?;
            let bytes = chunk.as_ref();
            file.write_all(bytes).await?;
            len += bytes.len() as u64;
        }
        file.flush().await?;

        Ok(StagedFile { path, len })
    }
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the stage
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove the staged file now, reporting failure instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}
