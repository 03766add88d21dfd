//! Per-task failure type.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::transport::TransportError;

/// Coarse failure category reported for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Server answered with a status that is neither success nor range-not-satisfiable.
    RemoteRejected,
    /// Connection, timeout or protocol failure before or during the body.
    Transport,
    /// Destination could not be opened, written or synced.
    Storage,
    /// Shutdown was requested before the task finished.
    Interrupted,
    /// The task itself failed to run (panicked or was cancelled).
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::RemoteRejected => "remote rejected",
            ErrorKind::Transport => "transport",
            ErrorKind::Storage => "storage",
            ErrorKind::Interrupted => "interrupted",
            ErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Why a task ended in failure. Never propagated past the task's own outcome.
#[derive(Debug, Error)]
pub enum TransferError {
    /// `reason` is the rendered status, e.g. `HTTP 404 Not Found`.
    #[error("remote rejected: {reason}")]
    RemoteRejected { status: u32, reason: String },

    #[error("transport: {0}")]
    Transport(#[source] TransportError),

    #[error("storage: {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted by shutdown request")]
    Interrupted,

    #[error("internal: {0}")]
    Internal(String),
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::RemoteRejected { .. } => ErrorKind::RemoteRejected,
            TransferError::Transport(_) => ErrorKind::Transport,
            TransferError::Storage { .. } => ErrorKind::Storage,
            TransferError::Interrupted => ErrorKind::Interrupted,
            TransferError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Storage {
            path: path.into(),
            source,
        }
    }
}
