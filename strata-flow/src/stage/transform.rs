use super::component::StageComponent;
use super::types::StageFuture;
use crate::signal::CancelSignal;

/// The asynchronous per-item transform a stage applies.
///
/// A transform maps one input to zero, one, or many outputs. It decides
/// per item whether to consult the [`CancelSignal`]; expensive loops must
/// check it at a granularity no coarser than a few milliseconds of work.
/// Clone the signal into the returned future when the work needs it.
///
/// Returning [`StageError::Cancelled`](crate::StageError::Cancelled)
/// resolves the stage [`Cancelled`](crate::Outcome::Cancelled); any other
/// error resolves it [`Faulted`](crate::Outcome::Faulted).
pub trait Transform: StageComponent {
    fn apply(&self, input: Self::Input, cancel: &CancelSignal)
        -> StageFuture<'_, Vec<Self::Output>>;
}
