use tracing::debug;

use crate::outcome::{resolved, CompletionWatch, Outcome};
use crate::stage::handle::StageHandle;

/// Wires an upstream stage's completion outcome to its downstream
/// neighbor.
///
/// When the upstream succeeds, the downstream is completed and finishes
/// normally once its queue drains. When the upstream cancels or faults,
/// the downstream is immediately forced into the same terminal outcome,
/// discarding any still-queued items. The terminal stage's completion
/// therefore always resolves, even when no item was ever routed.
pub fn propagate<U, D>(upstream: &StageHandle<U>, downstream: &StageHandle<D>)
where
    U: Send + 'static,
    D: Send + 'static,
{
    propagate_all(vec![upstream.completion()], downstream);
}

/// Wires several upstream completion outcomes to one downstream stage.
///
/// The downstream is completed only after every upstream succeeds;
/// completing on the first success would close the stage while another
/// upstream may still emit. The first cancelled or faulted upstream
/// forces the downstream at once.
pub fn propagate_all<D: Send + 'static>(
    upstreams: Vec<CompletionWatch>,
    downstream: &StageHandle<D>,
) {
    let downstream = downstream.clone();
    tokio::spawn(async move {
        // Race the watches: the first failure must force the downstream
        // without waiting on siblings that are still running.
        let mut pending: Vec<_> = upstreams
            .into_iter()
            .map(|mut watch| Box::pin(async move { resolved(&mut watch).await }))
            .collect();
        while !pending.is_empty() {
            let (outcome, _index, rest) = futures::future::select_all(pending).await;
            match outcome {
                Outcome::Succeeded => pending = rest,
                outcome @ (Outcome::Cancelled | Outcome::Faulted(_)) => {
                    debug!(
                        stage = downstream.name(),
                        outcome = ?outcome,
                        "propagating upstream failure"
                    );
                    downstream.force(outcome);
                    return;
                }
            }
        }
        debug!(stage = downstream.name(), "all upstreams succeeded; completing");
        downstream.complete();
    });
}
