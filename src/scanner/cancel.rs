//! Cancellation flag shared with the scan loop

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cooperative cancellation signal shared between the scan loop and
/// whoever wants to stop it (a Ctrl-C handler, another thread).
///
/// Clones share the same flag. The scan loop polls it between files only.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear the flag so the owning scanner can run again
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
