//! Batch orchestration: fan out one transfer per locator, report together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::control::AbortToken;
use crate::progress::{NullSink, ProgressFactory, ProgressSink};
use crate::transfer::{self, TransferError, TransferOutcome};
use crate::transport::Transport;

use super::gate::TransferGate;
use super::task::DownloadTask;

/// Terminal outcome of one task, paired with the task.
#[derive(Debug)]
pub struct TaskReport {
    pub task: DownloadTask,
    pub outcome: TransferOutcome,
}

/// Per-task outcomes in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub tasks: Vec<TaskReport>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of failed tasks; 0 means every task succeeded.
    pub fn exit_code(&self) -> usize {
        self.tasks.iter().filter(|t| !t.outcome.is_success()).count()
    }

    /// Failed tasks with their errors, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&DownloadTask, &TransferError)> {
        self.tasks
            .iter()
            .filter_map(|t| t.outcome.error().map(|e| (&t.task, e)))
    }
}

/// Runs batches of locators against one shared transport.
pub struct Batch<T, F> {
    transport: Arc<T>,
    gate: TransferGate,
    progress: Arc<F>,
    directory: PathBuf,
    abort: AbortToken,
}

impl<T, F> Batch<T, F>
where
    T: Transport,
    F: ProgressFactory,
{
    /// Destinations resolve under the current directory until [`Batch::directory`] is set.
    pub fn new(transport: T, gate: TransferGate, progress: F) -> Self {
        Self {
            transport: Arc::new(transport),
            gate,
            progress: Arc::new(progress),
            directory: PathBuf::from("."),
            abort: AbortToken::new(),
        }
    }

    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = dir.into();
        self
    }

    pub fn abort_token(mut self, token: AbortToken) -> Self {
        self.abort = token;
        self
    }

    pub fn gate(&self) -> &TransferGate {
        &self.gate
    }

    /// Runs every locator to a terminal outcome. Never fails as a whole: each
    /// task's failure is recorded in its own report entry.
    pub async fn run(&self, locators: &[String]) -> BatchReport {
        let tasks = prepare_tasks(locators, &self.directory).await;
        tracing::info!(
            tasks = tasks.len(),
            cap = ?self.gate.cap(),
            dir = %self.directory.display(),
            "starting batch"
        );

        let handles: Vec<_> = tasks
            .iter()
            .cloned()
            .map(|task| {
                let transport = Arc::clone(&self.transport);
                let progress = Arc::clone(&self.progress);
                let gate = self.gate.clone();
                let abort = self.abort.clone();
                tokio::spawn(async move {
                    let mut sink = progress.sink_for(&task);
                    let outcome = run_task(&*transport, &gate, &task, &mut sink, &abort).await;
                    sink.finish(&outcome);
                    outcome
                })
            })
            .collect();

        let mut report = BatchReport::default();
        for (task, handle) in tasks.into_iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(locator = %task.locator, "task did not complete: {}", e);
                    TransferOutcome::Failure(TransferError::Internal(e.to_string()))
                }
            };
            report.tasks.push(TaskReport { task, outcome });
        }

        tracing::info!(
            tasks = report.len(),
            failed = report.exit_code(),
            "batch finished"
        );
        report
    }
}

/// Runs `locators` into `directory` with an optional cap and no progress reporting.
pub async fn run_batch<T: Transport>(
    transport: T,
    locators: &[String],
    max_concurrent: Option<usize>,
    directory: &Path,
) -> BatchReport {
    Batch::new(transport, TransferGate::new(max_concurrent), |_: &DownloadTask| NullSink)
        .directory(directory)
        .run(locators)
        .await
}

async fn run_task<T, S>(
    transport: &T,
    gate: &TransferGate,
    task: &DownloadTask,
    sink: &mut S,
    abort: &AbortToken,
) -> TransferOutcome
where
    T: Transport,
    S: ProgressSink + ?Sized,
{
    let _permit = match gate.acquire().await {
        Ok(permit) => permit,
        Err(e) => return TransferOutcome::Failure(e),
    };
    transfer::transfer(transport, task, sink, abort).await
}

/// Builds tasks in input order. Destinations claimed by more than one task are
/// logged; the later task overwrites or resumes the same file.
async fn prepare_tasks(locators: &[String], dir: &Path) -> Vec<DownloadTask> {
    let mut tasks = Vec::with_capacity(locators.len());
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();
    for (index, locator) in locators.iter().enumerate() {
        let task = DownloadTask::prepare(index, locator, dir).await;
        if let Some(first) = claimed.get(&task.destination) {
            tracing::warn!(
                locator = %locator,
                destination = %task.destination.display(),
                first_index = first + 1,
                index = index + 1,
                "destination collides with an earlier locator"
            );
        } else {
            claimed.insert(task.destination.clone(), index);
        }
        tasks.push(task);
    }
    tasks
}
