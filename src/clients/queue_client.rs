//! # Queue Client
//!
//! Facade over the Anvil labeling-queue service: assignment checkout, label
//! submission, and queue progress snapshots behind the Anvil resilience
//! wrapper.
//!
//! `submit_label` is deliberately excluded from retry: replaying a create
//! after an ambiguous timeout could record a duplicate label, and that
//! decision belongs to the caller, not this layer.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::adapters::{AnvilAdapter, HttpAnvilAdapter, MockAnvilAdapter};
use crate::clients::log_outcome;
use crate::config::{AdapterKind, UpstreamConfig};
use crate::error::Result;
use crate::models::{Assignment, Label, QueueStats};
use crate::resilience::{CircuitState, Resilience};

pub const UPSTREAM: &str = "anvil";

pub struct QueueClient {
    adapter: Arc<dyn AnvilAdapter>,
    resilience: Resilience,
}

impl QueueClient {
    /// Wrap an explicit adapter. Tests inject mocks here.
    pub fn new(adapter: Arc<dyn AnvilAdapter>, config: &UpstreamConfig) -> Self {
        Self {
            resilience: Resilience::from_config(UPSTREAM, config),
            adapter,
        }
    }

    /// Select the adapter from configuration.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let adapter: Arc<dyn AnvilAdapter> = match config.adapter {
            AdapterKind::Mock => Arc::new(MockAnvilAdapter::with_queue("q-default", 3)),
            AdapterKind::Http => Arc::new(HttpAnvilAdapter::new(&config.base_url, config.timeout())),
        };
        info!(
            component = UPSTREAM,
            adapter = adapter.name(),
            base_url = %config.base_url,
            "🔌 Queue client configured"
        );
        Self::new(adapter, config)
    }

    /// Check the next assignment out of `queue_id` for `user_id`. Idempotent
    /// from the transport's perspective (a retried checkout hands out the
    /// same or the next unit of work, never a duplicate), so retried on
    /// timeout/network.
    pub async fn get_next_assignment(&self, queue_id: &str, user_id: &str) -> Result<Assignment> {
        let result = self
            .resilience
            .read("get_next_assignment", || {
                self.adapter.get_next_assignment(queue_id, user_id)
            })
            .await;
        log_outcome(UPSTREAM, "get_next_assignment", &result);
        result
    }

    /// Submit label values against a checked-out assignment. Exactly one
    /// underlying call regardless of outcome.
    pub async fn submit_label(
        &self,
        assignment_id: &str,
        values: BTreeMap<String, serde_json::Value>,
        elapsed_seconds: f64,
    ) -> Result<Label> {
        let result = self
            .resilience
            .write(
                "submit_label",
                self.adapter
                    .submit_label(assignment_id, values, elapsed_seconds),
            )
            .await;
        log_outcome(UPSTREAM, "submit_label", &result);
        result
    }

    /// Queue progress snapshot. Idempotent read: retried on timeout/network.
    pub async fn get_queue_stats(&self, queue_id: &str) -> Result<QueueStats> {
        let result = self
            .resilience
            .read("get_queue_stats", || self.adapter.get_queue_stats(queue_id))
            .await;
        log_outcome(UPSTREAM, "get_queue_stats", &result);
        result
    }

    /// Liveness probe: timeout-bounded, no retry, breaker bypassed.
    pub async fn health_check(&self) -> Result<()> {
        let result = self
            .resilience
            .probe("health_check", self.adapter.health_check())
            .await;
        log_outcome(UPSTREAM, "health_check", &result);
        result
    }

    /// Current breaker state for the Anvil upstream, for health surfaces.
    pub fn breaker_state(&self) -> CircuitState {
        self.resilience.breaker_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use serde_json::json;

    fn fast_config() -> UpstreamConfig {
        UpstreamConfig {
            timeout_ms: 100,
            retry_attempts: 3,
            retry_base_delay_ms: 5,
            breaker_failure_threshold: 5,
            breaker_cooldown_ms: 50,
            ..UpstreamConfig::default()
        }
    }

    #[tokio::test]
    async fn test_checkout_then_submit_round() {
        let mock = Arc::new(MockAnvilAdapter::with_queue("q-audio", 1));
        let client = QueueClient::new(mock.clone(), &fast_config());

        let assignment = client.get_next_assignment("q-audio", "user-7").await.unwrap();
        let mut values = BTreeMap::new();
        values.insert("rating".to_string(), json!(4));

        let label = client
            .submit_label(&assignment.id, values, 21.4)
            .await
            .unwrap();
        assert_eq!(label.assignment_id, assignment.id);
        assert_eq!(label.user_id, "user-7");
        assert_eq!(mock.submitted_labels().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_queue_yields_no_assignments() {
        let mock = Arc::new(MockAnvilAdapter::new());
        let client = QueueClient::new(mock.clone(), &fast_config());

        let err = client.get_next_assignment("q-empty", "user-7").await.unwrap_err();
        assert!(matches!(err, ClientError::NoAssignments { .. }));
        // Domain outcome: no retries burned on it
        assert_eq!(mock.next_assignment_call_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_timeout_is_never_retried() {
        let mock = Arc::new(MockAnvilAdapter::with_queue("q-audio", 1));
        let client = QueueClient::new(mock.clone(), &fast_config());

        let assignment = client.get_next_assignment("q-audio", "user-7").await.unwrap();
        mock.script_failure(ClientError::Timeout {
            operation: "submit_label".to_string(),
            timeout_ms: 100,
        });

        let err = client
            .submit_label(&assignment.id, BTreeMap::new(), 3.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
        assert_eq!(mock.submit_call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_required_field_names_field() {
        let mock = Arc::new(MockAnvilAdapter::with_queue("q-audio", 1));
        let client = QueueClient::new(mock, &fast_config());

        let assignment = client.get_next_assignment("q-audio", "user-7").await.unwrap();
        let err = client
            .submit_label(&assignment.id, BTreeMap::new(), 3.0)
            .await
            .unwrap_err();
        match err {
            ClientError::Validation { fields } => assert!(fields.contains_key("rating")),
            other => panic!("expected validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stats_invariant_held_through_facade() {
        let mock = Arc::new(MockAnvilAdapter::with_queue("q-audio", 4));
        let client = QueueClient::new(mock, &fast_config());

        let stats = client.get_queue_stats("q-audio").await.unwrap();
        assert_eq!(stats.labeled + stats.remaining, stats.total);
    }
}
