//! Run control: a shared abort token for process-level shutdown.
//!
//! The CLI trips the token on Ctrl-C. Streaming loops check it between chunks,
//! so a write in progress always completes and the partial file stays resumable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable shutdown flag shared by every task of a batch.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that all transfers stop after their current chunk.
    pub fn request_abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
