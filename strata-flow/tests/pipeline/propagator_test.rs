use crate::helpers::{collector_stage, resolved_within, still_pending, FaultyTransform, Passthrough};
use std::time::Duration;

use strata_flow::{
    propagate, propagate_all, spawn, CancelSignal, Outcome, Router, StageError, StageOptions,
};

#[cfg(test)]
mod propagator_tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn it_should_complete_the_downstream_after_the_upstream_succeeds() {
        // Given
        let cancel = CancelSignal::new();
        let (sink, _) = collector_stage("sink", cancel.clone());
        let head = spawn(
            "head",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel,
            StageOptions::default(),
        );
        propagate(&head, &sink);

        // When
        head.complete();

        // Then: the sink resolves even though no item was ever routed
        assert_eq!(
            resolved_within(&mut sink.completion(), WAIT).await,
            Outcome::Succeeded
        );
    }

    #[tokio::test]
    async fn it_should_force_the_downstream_when_the_upstream_faults() {
        // Given
        let cancel = CancelSignal::new();
        let (sink, seen) = collector_stage("sink", cancel.clone());
        let head = spawn(
            "faulty",
            FaultyTransform,
            Router::new().otherwise(sink.clone()),
            cancel,
            StageOptions::default(),
        );
        propagate(&head, &sink);

        // When
        head.submit(1).await.unwrap();
        head.complete();

        // Then: the fault arrives downstream without any item
        let fault = Outcome::Faulted(StageError::Faulted("boom".to_string()));
        assert_eq!(resolved_within(&mut head.completion(), WAIT).await, fault);
        assert_eq!(resolved_within(&mut sink.completion(), WAIT).await, fault);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn it_should_force_the_downstream_when_the_upstream_is_cancelled() {
        // Given
        let cancel = CancelSignal::new();
        let (sink, _) = collector_stage("sink", cancel.clone());
        let head = spawn(
            "head",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        propagate(&head, &sink);

        // When
        cancel.request();
        head.submit(1).await.unwrap();
        head.complete();

        // Then
        assert_eq!(
            resolved_within(&mut head.completion(), WAIT).await,
            Outcome::Cancelled
        );
        assert_eq!(
            resolved_within(&mut sink.completion(), WAIT).await,
            Outcome::Cancelled
        );
    }

    #[tokio::test]
    async fn it_should_wait_for_every_upstream_before_completing_a_fan_in() {
        // Given: two producers feeding one sink
        let cancel = CancelSignal::new();
        let (sink, _) = collector_stage("sink", cancel.clone());
        let first = spawn(
            "first",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        let second = spawn(
            "second",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel,
            StageOptions::default(),
        );
        propagate_all(vec![first.completion(), second.completion()], &sink);

        // When: only one upstream has finished
        first.complete();

        // Then: the sink stays open for the other producer
        assert!(still_pending(&mut sink.completion(), Duration::from_millis(200)).await);

        // When: the second upstream finishes too
        second.complete();

        // Then
        assert_eq!(
            resolved_within(&mut sink.completion(), WAIT).await,
            Outcome::Succeeded
        );
    }

    #[tokio::test]
    async fn it_should_force_a_fan_in_as_soon_as_any_upstream_faults() {
        // Given: a healthy producer and a faulty one feeding the same sink
        let cancel = CancelSignal::new();
        let (sink, seen) = collector_stage("sink", cancel.clone());
        let healthy = spawn(
            "healthy",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        let faulty = spawn(
            "faulty",
            FaultyTransform,
            Router::new().otherwise(sink.clone()),
            cancel,
            StageOptions::default(),
        );
        propagate_all(vec![healthy.completion(), faulty.completion()], &sink);

        // When: the faulty upstream dies while the healthy one is still open
        faulty.submit(1).await.unwrap();
        faulty.complete();

        // Then: the sink is forced right away, not once the sibling resolves
        let fault = Outcome::Faulted(StageError::Faulted("boom".to_string()));
        assert_eq!(resolved_within(&mut sink.completion(), WAIT).await, fault);
        assert!(still_pending(&mut healthy.completion(), Duration::from_millis(200)).await);
        assert!(seen.lock().unwrap().is_empty());

        healthy.complete();
    }

    #[tokio::test]
    async fn it_should_resolve_a_whole_chain_when_the_head_dies() {
        // Given: head → mid → sink
        let cancel = CancelSignal::new();
        let (sink, seen) = collector_stage("sink", cancel.clone());
        let mid = spawn(
            "mid",
            Passthrough,
            Router::new().otherwise(sink.clone()),
            cancel.clone(),
            StageOptions::default(),
        );
        let head = spawn(
            "faulty",
            FaultyTransform,
            Router::new().otherwise(mid.clone()),
            cancel,
            StageOptions::default(),
        );
        propagate(&head, &mid);
        propagate(&mid, &sink);

        // When
        head.submit(1).await.unwrap();
        head.complete();

        // Then: every stage resolves faulted rather than hanging
        let fault = Outcome::Faulted(StageError::Faulted("boom".to_string()));
        assert_eq!(resolved_within(&mut head.completion(), WAIT).await, fault);
        assert_eq!(resolved_within(&mut mid.completion(), WAIT).await, fault);
        assert_eq!(resolved_within(&mut sink.completion(), WAIT).await, fault);
        assert!(seen.lock().unwrap().is_empty());
    }
}
