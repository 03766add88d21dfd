//! Task construction: one immutable task per locator.

use std::path::{Path, PathBuf};

use crate::resume::{self, ResumeIntent};
use crate::url_model;

/// One locator of the batch with its resolved destination and resume intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// 0-based position in the input list.
    pub index: usize,
    pub locator: String,
    pub destination: PathBuf,
    pub intent: ResumeIntent,
}

impl DownloadTask {
    pub fn new(
        index: usize,
        locator: impl Into<String>,
        destination: impl Into<PathBuf>,
        intent: ResumeIntent,
    ) -> Self {
        Self {
            index,
            locator: locator.into(),
            destination: destination.into(),
            intent,
        }
    }

    /// Resolves the destination under `dir` and probes it for a resume checkpoint.
    pub async fn prepare(index: usize, locator: &str, dir: &Path) -> Self {
        let destination = dir.join(url_model::resolve_destination(locator, index));
        let intent = resume::probe(&destination).await;
        Self::new(index, locator, destination, intent)
    }

    /// File name component of the destination, for display.
    pub fn file_name(&self) -> String {
        self.destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.destination.display().to_string())
    }
}
