//! Resume probe: the destination's current length is the resume checkpoint.
//!
//! No sidecar metadata is kept. If a regular file already exists at the
//! destination, the next request asks for the bytes after it.

use std::path::Path;

/// Whether to ask the server for a suffix of the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeIntent {
    /// No local file; download from the start.
    Fresh,
    /// A local file of `existing` bytes exists; request `bytes=existing-`.
    Resume { existing: u64 },
}

impl ResumeIntent {
    pub fn is_resume(&self) -> bool {
        matches!(self, ResumeIntent::Resume { .. })
    }

    /// Byte offset to request from, if resuming.
    pub fn offset(&self) -> Option<u64> {
        match self {
            ResumeIntent::Fresh => None,
            ResumeIntent::Resume { existing } => Some(*existing),
        }
    }
}

/// Stats `path` (never opens it). Anything other than an existing regular file is `Fresh`.
pub async fn probe(path: &Path) -> ResumeIntent {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => ResumeIntent::Resume {
            existing: meta.len(),
        },
        Ok(_) => {
            tracing::debug!(path = %path.display(), "destination exists but is not a regular file");
            ResumeIntent::Fresh
        }
        Err(_) => ResumeIntent::Fresh,
    }
}
