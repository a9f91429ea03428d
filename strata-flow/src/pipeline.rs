use std::sync::{Mutex, PoisonError};

use tracing::{info, instrument};

use crate::error::PipelineError;
use crate::outcome::{resolved, CompletionWatch, Outcome};
use crate::signal::CancelSignal;
use crate::stage::handle::StageHandle;

enum RunState {
    Idle,
    Running,
    Finished,
}

/// A composed set of stages with one entry point and one terminal
/// completion future.
///
/// The caller builds the stages, routers, and propagation wiring, then
/// registers the head handle and every stage's completion watch here.
/// [`run`](Self::run) drives exactly one run: `Idle → Running` on the
/// first submit, then one terminal outcome. A pipeline instance is bound
/// to one run; starting another requires a new instance with a fresh
/// [`CancelSignal`].
pub struct Pipeline<In> {
    head: StageHandle<In>,
    completions: Vec<CompletionWatch>,
    cancel: CancelSignal,
    state: Mutex<RunState>,
}

impl<In: Send + 'static> Pipeline<In> {
    #[must_use]
    pub fn new(
        head: StageHandle<In>,
        completions: Vec<CompletionWatch>,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            head,
            completions,
            cancel,
            state: Mutex::new(RunState::Idle),
        }
    }

    /// The cancellation signal shared by every stage of this instance.
    #[must_use]
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Requests cooperative cancellation of the current run.
    ///
    /// Meaningful at most once per run; further calls are no-ops.
    pub fn cancel(&self) {
        self.cancel.request();
    }

    /// Runs the pipeline to its terminal outcome.
    ///
    /// Submits `input` to the head stage, marks the head complete, and
    /// waits for every registered stage to resolve. The terminal outcome
    /// aggregates bottom-up. Any faulted stage makes the run
    /// [`Outcome::Faulted`], first cause winning. Otherwise the run is
    /// [`Outcome::Cancelled`] if any stage cancelled or the signal was
    /// requested.
    ///
    /// # Errors
    ///
    /// [`PipelineError::AlreadyRunning`] while a run is in flight,
    /// [`PipelineError::AlreadyFinished`] after a terminal state, and
    /// [`PipelineError::Stage`] if the head stage rejected the input.
    #[instrument(skip(self, input))]
    pub async fn run(&self, input: In) -> Result<Outcome, PipelineError> {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match *state {
                RunState::Idle => *state = RunState::Running,
                RunState::Running => return Err(PipelineError::AlreadyRunning),
                RunState::Finished => return Err(PipelineError::AlreadyFinished),
            }
        }
        info!("pipeline run started");

        let submitted = self.head.submit(input).await;
        self.head.complete();
        if let Err(e) = submitted {
            self.finish();
            return Err(PipelineError::Stage(e));
        }

        let mut watches = self.completions.clone();
        let outcomes = futures::future::join_all(watches.iter_mut().map(resolved)).await;

        let mut terminal = Outcome::Succeeded;
        for outcome in outcomes {
            match outcome {
                Outcome::Succeeded => {}
                Outcome::Cancelled => {
                    if terminal.is_succeeded() {
                        terminal = Outcome::Cancelled;
                    }
                }
                faulted @ Outcome::Faulted(_) => {
                    if !terminal.is_faulted() {
                        terminal = faulted;
                    }
                }
            }
        }
        // a run whose stages all drained before noticing the signal is
        // still a cancelled run
        if terminal.is_succeeded() && self.cancel.is_requested() {
            terminal = Outcome::Cancelled;
        }

        self.finish();
        info!(outcome = ?terminal, "pipeline run finished");
        Ok(terminal)
    }

    fn finish(&self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = RunState::Finished;
    }
}
