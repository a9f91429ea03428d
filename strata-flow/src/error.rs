use thiserror::Error;

/// Errors surfaced by stage transforms and stage handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Cooperative cancellation was requested. Not an error condition
    /// from the system's perspective; it resolves the stage
    /// [`Cancelled`](crate::Outcome::Cancelled) rather than faulting it.
    #[error("cancellation requested")]
    Cancelled,

    /// The stage was marked complete (or forced to a terminal outcome)
    /// and no longer accepts input.
    #[error("stage is closed to new input")]
    Closed,

    /// An unexpected failure inside a stage's transform. Terminal for the
    /// whole pipeline; never retried.
    #[error("stage fault: {0}")]
    Faulted(String),

    /// A precondition the design guarantees was violated. Fatal, not
    /// retried.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

/// Errors surfaced by [`Pipeline`](crate::Pipeline) runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A run is already in flight on this instance.
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// This instance already reached a terminal state; a new run needs a
    /// new instance.
    #[error("pipeline already finished; build a new instance for another run")]
    AlreadyFinished,

    /// The head stage rejected the run's input.
    #[error(transparent)]
    Stage(#[from] StageError),
}
