//! Staged, cancellable data-processing pipelines with predicate-based
//! routing.
//!
//! A [`Pipeline`] composes independently scheduled [stages](stage) into a
//! single addressable unit: each stage runs an asynchronous [`Transform`]
//! on its own worker task, draining a bounded queue and handing outputs to
//! a [`Router`] that delivers every item to exactly one downstream
//! consumer (first matching predicate wins, an unguarded edge is the
//! catch-all). Each stage resolves a terminal [`Outcome`], and
//! [`propagate`] carries it forward, so a failure or cancellation
//! anywhere upstream deterministically resolves everything downstream
//! instead of leaving a stage stalled.
//!
//! Cancellation is cooperative: one [`CancelSignal`] is shared by a whole
//! pipeline run, workers consult it between items, and transforms consult
//! it inside expensive loops.

pub mod envelope;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod propagator;
pub mod router;
pub mod signal;
pub mod stage;

// Re-export main types for easier access
pub use envelope::Envelope;
pub use error::{PipelineError, StageError};
pub use outcome::{resolved, CompletionWatch, Outcome};
pub use pipeline::Pipeline;
pub use propagator::{propagate, propagate_all};
pub use router::Router;
pub use signal::CancelSignal;
pub use stage::component::StageComponent;
pub use stage::handle::StageHandle;
pub use stage::runner::{spawn, StageOptions};
pub use stage::transform::Transform;
pub use stage::types::StageFuture;
