//! Per-task transfer state machine.
//!
//! One call drives one task from request to terminal outcome:
//!
//! 1. Build the request; a resume asks for `Range: bytes=<existing>-`.
//! 2. Wait for the response metadata (no body consumed yet).
//! 3. Classify: range-not-satisfiable on a resume means the file is already
//!    complete; partial content appends; any other success truncates; every
//!    other status is a rejection and the body is dropped unread.
//! 4. Stream chunks into the destination, reporting progress after each write.
//!
//! Failures never escape as errors: they become [`TransferOutcome::Failure`]
//! so the batch can aggregate them as plain data.

mod classify;
mod error;

pub use error::{ErrorKind, TransferError};

use std::path::Path;

use crate::control::AbortToken;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::resume::ResumeIntent;
use crate::scheduler::DownloadTask;
use crate::status::describe_status;
use crate::storage::{DestinationWriter, WriteMode};
use crate::transport::{ChunkStream, Transport};
use classify::{classify, Plan};

/// How a successful transfer left the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Server reported nothing beyond the local file; nothing written.
    AlreadyComplete,
    /// Fresh download from an empty destination.
    Downloaded,
    /// Range honoured; new bytes appended to the existing prefix.
    Resumed,
    /// Resume requested but the server sent the whole resource; old prefix discarded.
    Restarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub completion: Completion,
    /// Bytes written during this run.
    pub bytes_written: u64,
    /// Destination length after the transfer.
    pub size_on_disk: u64,
}

/// Terminal result of one task. Produced exactly once per task.
#[derive(Debug)]
pub enum TransferOutcome {
    Success(TransferSummary),
    Failure(TransferError),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            TransferOutcome::Success(_) => None,
            TransferOutcome::Failure(e) => Some(e),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error().map(TransferError::kind)
    }
}

impl From<Result<TransferSummary, TransferError>> for TransferOutcome {
    fn from(result: Result<TransferSummary, TransferError>) -> Self {
        match result {
            Ok(summary) => TransferOutcome::Success(summary),
            Err(e) => TransferOutcome::Failure(e),
        }
    }
}

/// Runs `task` to its terminal outcome, feeding `sink` one event per written chunk.
///
/// The abort token is checked before the request and after every written
/// chunk; a tripped token ends the task as [`TransferError::Interrupted`] with
/// the bytes written so far left on disk for a later resume.
pub async fn transfer<T, S>(
    transport: &T,
    task: &DownloadTask,
    sink: &mut S,
    abort: &AbortToken,
) -> TransferOutcome
where
    T: Transport,
    S: ProgressSink + ?Sized,
{
    let outcome: TransferOutcome = run(transport, task, sink, abort).await.into();
    match &outcome {
        TransferOutcome::Success(summary) => tracing::info!(
            locator = %task.locator,
            completion = ?summary.completion,
            bytes_written = summary.bytes_written,
            "transfer complete"
        ),
        TransferOutcome::Failure(e) => tracing::warn!(
            locator = %task.locator,
            kind = %e.kind(),
            "transfer failed: {}",
            e
        ),
    }
    outcome
}

async fn run<T, S>(
    transport: &T,
    task: &DownloadTask,
    sink: &mut S,
    abort: &AbortToken,
) -> Result<TransferSummary, TransferError>
where
    T: Transport,
    S: ProgressSink + ?Sized,
{
    if abort.is_aborted() {
        return Err(TransferError::Interrupted);
    }

    let mut headers = Vec::new();
    if let Some(offset) = task.intent.offset() {
        headers.push(("Range".to_string(), format!("bytes={}-", offset)));
    }

    tracing::debug!(locator = %task.locator, intent = ?task.intent, "requesting");
    let (meta, body) = transport
        .start(&task.locator, &headers)
        .await
        .map_err(TransferError::Transport)?;

    let plan = classify(task.intent, &meta);
    tracing::debug!(locator = %task.locator, status = meta.status, ?plan, "classified response");

    match plan {
        Plan::Reject { status } => {
            drop(body);
            Err(TransferError::RemoteRejected {
                status,
                reason: describe_status(status),
            })
        }
        Plan::Satisfied { existing } => {
            drop(body);
            sink.observe(ProgressEvent {
                received: existing,
                cumulative: existing,
                total: Some(existing),
            });
            Ok(TransferSummary {
                completion: Completion::AlreadyComplete,
                bytes_written: 0,
                size_on_disk: existing,
            })
        }
        Plan::Stream { mode, base, total } => {
            let completion = match (mode, task.intent.is_resume()) {
                (WriteMode::Append, _) => Completion::Resumed,
                (WriteMode::Truncate, true) => Completion::Restarted,
                (WriteMode::Truncate, false) => Completion::Downloaded,
            };
            if completion == Completion::Restarted {
                tracing::warn!(
                    locator = %task.locator,
                    "server ignored range request; restarting from empty"
                );
            }
            let written = stream(body, &task.destination, mode, base, total, sink, abort).await?;
            Ok(TransferSummary {
                completion,
                bytes_written: written,
                size_on_disk: base.saturating_add(written),
            })
        }
    }
}

async fn stream<B, S>(
    mut body: B,
    destination: &Path,
    mode: WriteMode,
    base: u64,
    total: Option<u64>,
    sink: &mut S,
    abort: &AbortToken,
) -> Result<u64, TransferError>
where
    B: ChunkStream,
    S: ProgressSink + ?Sized,
{
    let mut writer = DestinationWriter::open(destination, mode)
        .await
        .map_err(|e| TransferError::storage(destination, e))?;

    let mut cumulative = base;
    if base > 0 {
        sink.observe(ProgressEvent {
            received: base,
            cumulative,
            total,
        });
    }

    loop {
        let chunk = match body.next_chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                writer.close().await;
                return Err(TransferError::Transport(e));
            }
        };
        if chunk.is_empty() {
            continue;
        }
        if let Err(e) = writer.write_chunk(&chunk).await {
            writer.close().await;
            return Err(TransferError::storage(destination, e));
        }
        cumulative = cumulative.saturating_add(chunk.len() as u64);
        sink.observe(ProgressEvent {
            received: chunk.len() as u64,
            cumulative,
            total,
        });
        if abort.is_aborted() {
            tracing::debug!(path = %destination.display(), cumulative, "stopping after chunk on abort");
            writer.close().await;
            return Err(TransferError::Interrupted);
        }
    }

    writer
        .finish()
        .await
        .map_err(|e| TransferError::storage(destination, e))
}
