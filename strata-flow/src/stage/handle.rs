use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::StageError;
use crate::outcome::{CompletionWatch, Outcome};

pub(crate) enum Control {
    Force(Outcome),
}

pub(crate) struct Shared<T> {
    name: &'static str,
    input: Mutex<Option<flume::Sender<T>>>,
    control: mpsc::UnboundedSender<Control>,
    completion: CompletionWatch,
}

/// Clonable handle to a spawned stage.
///
/// Producers submit items through it, the fault propagator drives
/// completion through it, and anyone may watch the terminal outcome.
pub struct StageHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for StageHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> StageHandle<T> {
    pub(crate) fn new(
        name: &'static str,
        input: flume::Sender<T>,
        control: mpsc::UnboundedSender<Control>,
        completion: CompletionWatch,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                input: Mutex::new(Some(input)),
                control,
                completion,
            }),
        }
    }

    /// The stage's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    /// Enqueues one input item.
    ///
    /// Suspends while the stage's bounded queue is full (backpressure).
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Closed`] if the stage has already been
    /// completed or forced to a terminal outcome.
    pub async fn submit(&self, item: T) -> Result<(), StageError> {
        let sender = {
            let guard = self
                .shared
                .input
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            guard.clone()
        };
        match sender {
            Some(sender) => sender.send_async(item).await.map_err(|_| StageError::Closed),
            None => Err(StageError::Closed),
        }
    }

    /// Marks no-more-input. Idempotent.
    ///
    /// The worker drains whatever is already queued, then resolves
    /// [`Outcome::Succeeded`].
    pub fn complete(&self) {
        let closed = self
            .shared
            .input
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if closed {
            debug!(stage = self.shared.name, "input closed");
        }
    }

    /// Forces the stage to a terminal outcome, discarding queued items.
    ///
    /// Used by the fault propagator when an upstream stage cancelled or
    /// faulted; the worker stops at its next checkpoint without waiting
    /// for the queue to drain.
    pub fn force(&self, outcome: Outcome) {
        self.complete();
        let _ = self.shared.control.send(Control::Force(outcome));
    }

    /// A watch on the stage's terminal outcome.
    #[must_use]
    pub fn completion(&self) -> CompletionWatch {
        self.shared.completion.clone()
    }
}
