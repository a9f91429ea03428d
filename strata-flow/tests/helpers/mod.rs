use std::sync::{Arc, Mutex};
use std::time::Duration;

use strata_flow::{
    resolved, spawn, CancelSignal, CompletionWatch, Outcome, Router, StageComponent, StageError,
    StageFuture, StageHandle, StageOptions, Transform,
};
use tracing_subscriber::EnvFilter;

// Test Components

/// Doubles each number it sees.
pub struct Doubler;

impl StageComponent for Doubler {
    type Input = i64;
    type Output = i64;
}

impl Transform for Doubler {
    fn apply(&self, input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        Box::pin(async move { Ok(vec![input * 2]) })
    }
}

/// Forwards each item unchanged.
pub struct Passthrough;

impl StageComponent for Passthrough {
    type Input = i64;
    type Output = i64;
}

impl Transform for Passthrough {
    fn apply(&self, input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        Box::pin(async move { Ok(vec![input]) })
    }
}

/// Faults on every item.
pub struct FaultyTransform;

impl StageComponent for FaultyTransform {
    type Input = i64;
    type Output = i64;
}

impl Transform for FaultyTransform {
    fn apply(&self, _input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        Box::pin(async move { Err(StageError::Faulted("boom".to_string())) })
    }
}

/// Observes cancellation mid-work and exits cooperatively.
pub struct CooperativeCancel;

impl StageComponent for CooperativeCancel {
    type Input = i64;
    type Output = i64;
}

impl Transform for CooperativeCancel {
    fn apply(&self, _input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        Box::pin(async move { Err(StageError::Cancelled) })
    }
}

/// Sleeps per item, long enough to straddle checkpoints in tests.
pub struct Slow {
    pub delay: Duration,
}

impl StageComponent for Slow {
    type Input = i64;
    type Output = i64;
}

impl Transform for Slow {
    fn apply(&self, input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            Ok(vec![input])
        })
    }
}

/// Records every item it receives.
pub struct Collector {
    seen: Arc<Mutex<Vec<i64>>>,
}

impl StageComponent for Collector {
    type Input = i64;
    type Output = i64;
}

impl Transform for Collector {
    fn apply(&self, input: i64, _cancel: &CancelSignal) -> StageFuture<'_, Vec<i64>> {
        self.seen.lock().unwrap().push(input);
        Box::pin(async move { Ok(Vec::new()) })
    }
}

// Helper Functions

/// Spawn a terminal collector stage, returning its handle and the record
/// of what it saw.
pub fn collector_stage(
    name: &'static str,
    cancel: CancelSignal,
) -> (StageHandle<i64>, Arc<Mutex<Vec<i64>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handle = spawn(
        name,
        Collector {
            seen: Arc::clone(&seen),
        },
        Router::new(),
        cancel,
        StageOptions::default(),
    );
    (handle, seen)
}

/// Await a stage outcome, panicking if the stage hangs.
pub async fn resolved_within(watch: &mut CompletionWatch, timeout: Duration) -> Outcome {
    tokio::time::timeout(timeout, resolved(watch))
        .await
        .expect("stage did not resolve in time")
}

/// True if the watch is still unresolved after `timeout`.
pub async fn still_pending(watch: &mut CompletionWatch, timeout: Duration) -> bool {
    tokio::time::timeout(timeout, resolved(watch)).await.is_err()
}

// Initialize tracing for tests that want the worker logs.
#[allow(dead_code)]
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("strata_flow=debug".parse().unwrap()),
        )
        .with_test_writer()
        .compact()
        .try_init();

    if subscriber.is_err() {
        println!("Warning: tracing already initialized");
    }
}
