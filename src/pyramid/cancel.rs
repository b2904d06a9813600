//! Build cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between the caller and the build
/// workers.
///
/// The token is checked between jobs: in-flight tile and level jobs run to
/// completion, no new jobs start, and the build returns
/// [`crate::error::BuildError::Cancelled`]. The partial output tree is left
/// on disk in the same explicitly-invalid state as a failed build.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
