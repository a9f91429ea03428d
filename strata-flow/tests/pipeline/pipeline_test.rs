use crate::helpers::{collector_stage, Doubler, Slow};
use std::sync::Arc;
use std::time::Duration;

use strata_flow::{
    propagate, spawn, CancelSignal, Outcome, Pipeline, PipelineError, Router, StageOptions,
};

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    fn doubling_pipeline() -> (Pipeline<i64>, Arc<std::sync::Mutex<Vec<i64>>>) {
        let cancel = CancelSignal::new();
        let (sink, seen) = collector_stage("sink", cancel.clone());
        let head = spawn(
            "double",
            Doubler,
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        propagate(&head, &sink);
        let completions = vec![head.completion(), sink.completion()];
        (Pipeline::new(head, completions, cancel), seen)
    }

    #[tokio::test]
    async fn it_should_run_to_a_successful_terminal_outcome() {
        // Given
        let (pipeline, seen) = doubling_pipeline();

        // When
        let outcome = pipeline.run(21).await.unwrap();

        // Then
        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[tokio::test]
    async fn it_should_reject_a_second_run_while_running() {
        // Given: a pipeline whose single stage is slow
        let cancel = CancelSignal::new();
        let head = spawn(
            "slow",
            Slow {
                delay: Duration::from_millis(300),
            },
            Router::new(),
            cancel.clone(),
            StageOptions::default(),
        );
        let pipeline = Arc::new(Pipeline::new(head.clone(), vec![head.completion()], cancel));

        let running = Arc::clone(&pipeline);
        let first = tokio::spawn(async move { running.run(1).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        // When
        let second = pipeline.run(2).await;

        // Then
        assert_eq!(second, Err(PipelineError::AlreadyRunning));
        assert_eq!(first.await.unwrap().unwrap(), Outcome::Succeeded);
    }

    #[tokio::test]
    async fn it_should_reject_runs_after_the_terminal_state() {
        // Given
        let (pipeline, _) = doubling_pipeline();
        pipeline.run(1).await.unwrap();

        // When
        let again = pipeline.run(2).await;

        // Then: a new run needs a new instance
        assert_eq!(again, Err(PipelineError::AlreadyFinished));
    }

    #[tokio::test]
    async fn it_should_resolve_cancelled_when_the_signal_is_requested_up_front() {
        // Given
        let (pipeline, seen) = doubling_pipeline();

        // When
        pipeline.cancel();
        let outcome = pipeline.run(1).await.unwrap();

        // Then: nothing reaches the sink
        assert_eq!(outcome, Outcome::Cancelled);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn it_should_resolve_cancelled_when_the_signal_is_requested_mid_run() {
        // Given: a slow head feeding a collector
        let cancel = CancelSignal::new();
        let (sink, seen) = collector_stage("sink", cancel.clone());
        let head = spawn(
            "slow",
            Slow {
                delay: Duration::from_millis(300),
            },
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        propagate(&head, &sink);
        let pipeline = Arc::new(Pipeline::new(
            head.clone(),
            vec![head.completion(), sink.completion()],
            cancel,
        ));

        // When: cancelled while the head is mid-item
        let running = Arc::clone(&pipeline);
        let run = tokio::spawn(async move { running.run(1).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        pipeline.cancel();

        // Then: the sink never processes the item and the run is cancelled
        assert_eq!(run.await.unwrap().unwrap(), Outcome::Cancelled);
        assert!(seen.lock().unwrap().is_empty());
    }
}
