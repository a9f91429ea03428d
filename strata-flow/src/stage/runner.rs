use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info_span, Instrument};

use super::handle::{Control, StageHandle};
use super::transform::Transform;
use crate::error::StageError;
use crate::outcome::Outcome;
use crate::router::Router;
use crate::signal::CancelSignal;

/// Queue capacity and execution context for one stage.
#[derive(Debug, Clone)]
pub struct StageOptions {
    /// Bounded input-queue length; [`StageHandle::submit`] suspends while
    /// the queue is full.
    pub capacity: usize,
    /// Runtime to spawn the worker on; `None` uses the current runtime.
    /// Lets consumers with context affinity (a dedicated presentation
    /// runtime, say) run apart from the general worker pool.
    pub runtime: Option<Handle>,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            capacity: 16,
            runtime: None,
        }
    }
}

/// Spawns a stage worker and returns its handle.
///
/// The worker drains the stage's queue, applies `component`'s transform
/// to each item, and hands every output to `router`. It resolves exactly
/// one terminal [`Outcome`]:
///
/// - input closed and drained → `Succeeded`;
/// - the transform returned `Err(Cancelled)`, or the signal was found
///   requested at an item boundary → `Cancelled`;
/// - the transform returned any other error → `Faulted`;
/// - [`StageHandle::force`] was called → the forced outcome, with any
///   still-queued items discarded.
pub fn spawn<C>(
    name: &'static str,
    component: C,
    router: Router<C::Output>,
    cancel: CancelSignal,
    options: StageOptions,
) -> StageHandle<C::Input>
where
    C: Transform + Send + Sync + 'static,
{
    let (input_tx, input_rx) = flume::bounded(options.capacity);
    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let (outcome_tx, outcome_rx) = watch::channel(None);

    let handle = StageHandle::new(name, input_tx, control_tx.clone(), outcome_rx);
    let worker = run_worker(
        name, component, router, cancel, input_rx, control_rx, outcome_tx, control_tx,
    )
    .instrument(info_span!("stage", name));
    match options.runtime {
        Some(runtime) => {
            runtime.spawn(worker);
        }
        None => {
            tokio::spawn(worker);
        }
    }
    handle
}

#[allow(clippy::too_many_arguments)]
async fn run_worker<C>(
    name: &'static str,
    component: C,
    router: Router<C::Output>,
    cancel: CancelSignal,
    items: flume::Receiver<C::Input>,
    mut control: mpsc::UnboundedReceiver<Control>,
    outcome: watch::Sender<Option<Outcome>>,
    // Held so the control channel can never close underneath the select.
    _control_keepalive: mpsc::UnboundedSender<Control>,
) where
    C: Transform + Send + Sync + 'static,
{
    let resolved = loop {
        tokio::select! {
            biased;
            ctl = control.recv() => {
                if let Some(Control::Force(forced)) = ctl {
                    debug!(stage = name, outcome = ?forced, "forced to terminal outcome");
                    break forced;
                }
            }
            item = items.recv_async() => match item {
                Ok(item) => {
                    // item-boundary cancellation checkpoint
                    if cancel.is_requested() {
                        break Outcome::Cancelled;
                    }
                    match component.apply(item, &cancel).await {
                        Ok(outputs) => {
                            for output in outputs {
                                router.deliver(output).await;
                            }
                        }
                        Err(StageError::Cancelled) => break Outcome::Cancelled,
                        Err(e) => {
                            error!(stage = name, error = %e, "transform failed");
                            break Outcome::Faulted(e);
                        }
                    }
                }
                // input closed and queue drained
                Err(_) => break Outcome::Succeeded,
            }
        }
    };
    debug!(stage = name, outcome = ?resolved, "stage resolved");
    let _ = outcome.send(Some(resolved));
}
