//! Sequential writer for a destination file.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use super::WriteMode;

/// Open destination file plus a count of bytes written through it.
/// The handle is released when the writer is dropped.
#[derive(Debug)]
pub struct DestinationWriter {
    file: File,
    path: PathBuf,
    written: u64,
}

impl DestinationWriter {
    /// Open `path` for a transfer. Both modes create the file if it is missing.
    pub async fn open(path: &Path, mode: WriteMode) -> io::Result<Self> {
        let mut options = tokio::fs::OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Truncate => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };
        let file = options.open(path).await?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Write a whole chunk at the current end of the file.
    pub async fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data).await?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written through this writer (excludes any pre-existing prefix).
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and sync file data; returns bytes written. Consumes the writer and closes the file.
    pub async fn finish(mut self) -> io::Result<u64> {
        self.file.flush().await?;
        self.file.sync_data().await?;
        Ok(self.written)
    }

    /// Best-effort flush on an aborted transfer so that everything already
    /// written reaches the file before the handle is released.
    pub async fn close(mut self) {
        if let Err(e) = self.file.flush().await {
            tracing::warn!(path = %self.path.display(), "flush on abort failed: {}", e);
        }
    }
}
