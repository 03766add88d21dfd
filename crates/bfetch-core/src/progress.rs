//! Progress reporting for transfers.
//!
//! The transfer loop feeds a [`ProgressSink`] one event per written chunk,
//! synchronously and in order. Sinks are per task; rendering is up to the
//! consumer (the CLI renders throttled terminal lines).

use crate::scheduler::DownloadTask;
use crate::transfer::TransferOutcome;

/// One progress update for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Bytes accounted by this event (chunk length, or the pre-existing size on resume).
    pub received: u64,
    /// Bytes of the destination known to be on disk so far.
    pub cumulative: u64,
    /// Expected final size, when the server told us.
    pub total: Option<u64>,
}

impl ProgressEvent {
    /// Fraction complete in [0.0, 1.0]; `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        let total = self.total?;
        if total == 0 {
            return Some(1.0);
        }
        Some((self.cumulative as f64 / total as f64).min(1.0))
    }
}

/// Observer of one task's progress. Must not block indefinitely: a slow sink
/// stalls its own transfer only.
pub trait ProgressSink: Send {
    fn observe(&mut self, event: ProgressEvent);

    /// Called once with the task's terminal outcome.
    fn finish(&mut self, _outcome: &TransferOutcome) {}
}

/// Creates one sink per task. Implemented for closures `Fn(&DownloadTask) -> S`.
pub trait ProgressFactory: Send + Sync + 'static {
    type Sink: ProgressSink + 'static;

    fn sink_for(&self, task: &DownloadTask) -> Self::Sink;
}

impl<F, S> ProgressFactory for F
where
    F: Fn(&DownloadTask) -> S + Send + Sync + 'static,
    S: ProgressSink + 'static,
{
    type Sink = S;

    fn sink_for(&self, task: &DownloadTask) -> S {
        self(task)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn observe(&mut self, _event: ProgressEvent) {}
}

/// Sink that records every event (handy for tests and summaries).
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }
}

impl ProgressSink for RecordingSink {
    fn observe(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
