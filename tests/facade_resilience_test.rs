//! Integration tests for the resilience guarantees the facades make:
//! bounded retry with backoff, no retry on submission, and the circuit
//! breaker lifecycle, all asserted through mock adapter call counters.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smithy_core::adapters::{MockAnvilAdapter, MockForgeAdapter};
use smithy_core::clients::{QueueClient, SampleClient};
use smithy_core::config::UpstreamConfig;
use smithy_core::error::ClientError;
use smithy_core::resilience::CircuitState;
use smithy_core::test_utils;

fn config(retry_attempts: u32, breaker_threshold: u32, cooldown_ms: u64) -> UpstreamConfig {
    UpstreamConfig {
        timeout_ms: 200,
        retry_attempts,
        retry_base_delay_ms: 20,
        breaker_failure_threshold: breaker_threshold,
        breaker_cooldown_ms: cooldown_ms,
        ..UpstreamConfig::default()
    }
}

fn timeout_error(operation: &str) -> ClientError {
    ClientError::Timeout {
        operation: operation.to_string(),
        timeout_ms: 200,
    }
}

#[tokio::test]
async fn two_timeouts_then_success_yields_three_spaced_calls() {
    test_utils::setup_test_environment();
    let forge = Arc::new(MockForgeAdapter::with_fixtures());
    forge.script_failure(timeout_error("get_sample"));
    forge.script_failure(timeout_error("get_sample"));
    let client = SampleClient::new(forge.clone(), &config(3, 10, 1000));

    let started = Instant::now();
    let sample = client.get_sample("smp-001").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(sample.id, "smp-001");
    assert_eq!(forge.get_sample_call_count(), 3);
    // Linear backoff: 20ms after attempt 1, 40ms after attempt 2
    assert!(
        elapsed >= Duration::from_millis(60),
        "expected backoff sleeps, finished in {elapsed:?}"
    );
}

#[tokio::test]
async fn retries_exhaust_and_surface_final_error() {
    let forge = Arc::new(MockForgeAdapter::with_fixtures());
    for _ in 0..3 {
        forge.script_failure(timeout_error("get_sample"));
    }
    let client = SampleClient::new(forge.clone(), &config(3, 10, 1000));

    let err = client.get_sample("smp-001").await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }));
    assert_eq!(forge.get_sample_call_count(), 3);
}

#[tokio::test]
async fn submit_label_is_called_exactly_once_on_timeout() {
    let anvil = Arc::new(MockAnvilAdapter::with_queue("q-audio", 1));
    let client = QueueClient::new(anvil.clone(), &config(3, 10, 1000));

    let assignment = client.get_next_assignment("q-audio", "user-7").await.unwrap();
    anvil.script_failure(timeout_error("submit_label"));

    let err = client
        .submit_label(&assignment.id, BTreeMap::new(), 5.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }));
    assert_eq!(anvil.submit_call_count(), 1);
}

#[tokio::test]
async fn breaker_short_circuits_without_touching_adapter() {
    let anvil = Arc::new(MockAnvilAdapter::with_queue("q-audio", 5));
    // No retries, so each facade call is exactly one adapter call
    let client = QueueClient::new(anvil.clone(), &config(1, 3, 10_000));

    for _ in 0..3 {
        anvil.script_failure(timeout_error("get_queue_stats"));
        let _ = client.get_queue_stats("q-audio").await;
    }
    assert_eq!(client.breaker_state(), CircuitState::Open);
    assert_eq!(anvil.stats_call_count(), 3);

    // Tripped: the next call fails fast with no adapter invocation
    let err = client.get_queue_stats("q-audio").await.unwrap_err();
    assert!(matches!(err, ClientError::CircuitOpen { .. }));
    assert_eq!(anvil.stats_call_count(), 3);
}

#[tokio::test]
async fn breaker_recovers_through_successful_probe() {
    let anvil = Arc::new(MockAnvilAdapter::with_queue("q-audio", 5));
    let client = QueueClient::new(anvil.clone(), &config(1, 2, 50));

    for _ in 0..2 {
        anvil.script_failure(timeout_error("get_queue_stats"));
        let _ = client.get_queue_stats("q-audio").await;
    }
    assert_eq!(client.breaker_state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(70)).await;

    // Exactly one probe is admitted and succeeds, closing the breaker
    let stats = client.get_queue_stats("q-audio").await.unwrap();
    assert_eq!(stats.labeled + stats.remaining, stats.total);
    assert_eq!(client.breaker_state(), CircuitState::Closed);

    // Subsequent calls are no longer short-circuited
    assert!(client.get_queue_stats("q-audio").await.is_ok());
}

#[tokio::test]
async fn breaker_reopens_when_probe_fails() {
    let anvil = Arc::new(MockAnvilAdapter::with_queue("q-audio", 5));
    let client = QueueClient::new(anvil.clone(), &config(1, 2, 50));

    for _ in 0..2 {
        anvil.script_failure(timeout_error("get_queue_stats"));
        let _ = client.get_queue_stats("q-audio").await;
    }
    assert_eq!(client.breaker_state(), CircuitState::Open);

    tokio::time::sleep(Duration::from_millis(70)).await;

    // Probe fails: breaker reopens and the cool-down restarts
    anvil.script_failure(timeout_error("get_queue_stats"));
    let _ = client.get_queue_stats("q-audio").await;
    assert_eq!(client.breaker_state(), CircuitState::Open);

    let calls_before = anvil.stats_call_count();
    let err = client.get_queue_stats("q-audio").await.unwrap_err();
    assert!(matches!(err, ClientError::CircuitOpen { .. }));
    assert_eq!(anvil.stats_call_count(), calls_before);
}

#[tokio::test]
async fn domain_errors_do_not_trip_the_breaker() {
    let anvil = Arc::new(MockAnvilAdapter::new());
    let client = QueueClient::new(anvil.clone(), &config(1, 2, 10_000));

    // Far more empty-queue responses than the failure threshold
    for _ in 0..5 {
        let err = client.get_next_assignment("q-empty", "user-7").await.unwrap_err();
        assert!(matches!(err, ClientError::NoAssignments { .. }));
    }
    assert_eq!(client.breaker_state(), CircuitState::Closed);
}

#[tokio::test]
async fn facades_are_safe_under_concurrent_callers() {
    let forge = Arc::new(MockForgeAdapter::with_fixtures());
    let client = SampleClient::new(forge.clone(), &config(3, 5, 1000));

    let results =
        futures::future::join_all((0..16).map(|_| client.get_sample("smp-001"))).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(forge.get_sample_call_count(), 16);
}
