use tokio::sync::watch;

use crate::error::StageError;

/// Terminal status of a stage: exactly one per stage per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The stage drained its input normally after being completed.
    Succeeded,
    /// The stage observed cancellation and exited cooperatively, or was
    /// forced here by an upstream cancellation.
    Cancelled,
    /// The stage's transform failed, or an upstream fault was propagated.
    Faulted(StageError),
}

impl Outcome {
    /// Whether this is [`Outcome::Succeeded`].
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Whether this is [`Outcome::Faulted`].
    #[must_use]
    pub const fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }
}

/// Watch channel carrying a stage's terminal outcome once it resolves.
///
/// `None` until the stage reaches a terminal state; any number of
/// observers may hold a watch.
pub type CompletionWatch = watch::Receiver<Option<Outcome>>;

/// Awaits the resolved outcome on a completion watch.
///
/// Always returns: a worker that disappears without publishing an outcome
/// is reported as a faulted stage rather than an eternal pend.
pub async fn resolved(watch: &mut CompletionWatch) -> Outcome {
    loop {
        if let Some(outcome) = watch.borrow_and_update().clone() {
            return outcome;
        }
        if watch.changed().await.is_err() {
            return Outcome::Faulted(StageError::InternalInvariantViolation(
                "stage worker exited without resolving an outcome".to_string(),
            ));
        }
    }
}
