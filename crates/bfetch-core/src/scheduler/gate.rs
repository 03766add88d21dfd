//! Concurrency gate shared by the tasks of one batch.
//!
//! Each task takes a permit before issuing its request and holds it until its
//! terminal outcome; the permit is released when dropped. Without a cap every
//! task passes immediately. Gates are plain values, so independent batches
//! (and tests) never share limits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::transfer::TransferError;

#[derive(Debug, Clone)]
pub struct TransferGate {
    semaphore: Option<Arc<Semaphore>>,
    cap: Option<usize>,
    in_use: Arc<AtomicUsize>,
}

impl TransferGate {
    /// `None` means unbounded. A cap of 0 is raised to 1.
    pub fn new(cap: Option<usize>) -> Self {
        let cap = cap.map(|n| n.max(1));
        Self {
            semaphore: cap.map(|n| Arc::new(Semaphore::new(n))),
            cap,
            in_use: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    /// Number of permits currently held.
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Relaxed)
    }

    /// Wait for a slot. Waiters are served in FIFO order.
    pub async fn acquire(&self) -> Result<GatePermit, TransferError> {
        let permit = match &self.semaphore {
            Some(sem) => Some(
                Arc::clone(sem)
                    .acquire_owned()
                    .await
                    .map_err(|_| TransferError::Internal("concurrency gate closed".to_string()))?,
            ),
            None => None,
        };
        self.in_use.fetch_add(1, Ordering::AcqRel);
        Ok(GatePermit {
            _permit: permit,
            in_use: Arc::clone(&self.in_use),
        })
    }
}

/// Releases its slot when dropped.
#[derive(Debug)]
pub struct GatePermit {
    _permit: Option<OwnedSemaphorePermit>,
    in_use: Arc<AtomicUsize>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}
