//! Batch scheduler.
//!
//! Turns a locator list into tasks (destination resolution and resume probe),
//! runs every task's transfer concurrently behind a [`TransferGate`], and
//! collects the outcomes in input order. A failing task never cancels its
//! siblings; the batch only reports how many failed.

mod batch;
mod gate;
mod task;

pub use batch::{run_batch, Batch, BatchReport, TaskReport};
pub use gate::{GatePermit, TransferGate};
pub use task::DownloadTask;
