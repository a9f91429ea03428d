use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::StageError;

/// A shared one-way "stop requested" flag observed cooperatively.
///
/// One signal is shared by an entire pipeline instance for the duration of
/// one run; a new run gets a new signal. The flag is monotonic: once
/// requested it is never reset. Readers may observe the request with some
/// delay; eventual visibility is all the design requires.
///
/// ```
/// use strata_flow::CancelSignal;
///
/// let signal = CancelSignal::new();
/// assert!(!signal.is_requested());
/// signal.request();
/// assert!(signal.is_requested());
/// assert!(signal.checkpoint().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    requested: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Creates a fresh, unrequested signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent; calls after the first are
    /// no-ops.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }

    /// Converts a pending request into an error at a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Cancelled`] if cancellation has been
    /// requested.
    pub fn checkpoint(&self) -> Result<(), StageError> {
        if self.is_requested() {
            Err(StageError::Cancelled)
        } else {
            Ok(())
        }
    }
}
