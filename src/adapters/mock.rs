//! # Mock Adapters
//!
//! In-memory adapters with no network or process dependency. They are the
//! configuration default, so the crate is usable with zero setup, and they
//! double as the test stubs for exercising error paths: failures can be
//! scripted ahead of time, and every operation keeps a call counter so tests
//! can assert exactly how many underlying calls a facade made.
//!
//! Responses are deterministic: fixtures in, same data out. A scripted
//! failure queue is consumed one entry per call, before normal behavior,
//! regardless of which operation consumes it.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::adapters::{AnvilAdapter, ForgeAdapter};
use crate::error::{ClientError, Result};
use crate::models::{Assignment, Label, QueueStats, Sample};
use crate::test_utils::fixtures;

/// Deterministic in-memory Forge.
#[derive(Default)]
pub struct MockForgeAdapter {
    samples: Mutex<HashMap<String, Sample>>,
    scripted: Mutex<VecDeque<ClientError>>,
    get_sample_calls: AtomicUsize,
    health_calls: AtomicUsize,
}

impl MockForgeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock pre-loaded with the standard fixture sample.
    pub fn with_fixtures() -> Self {
        let adapter = Self::new();
        adapter.insert_sample(fixtures::sample());
        adapter
    }

    pub fn insert_sample(&self, sample: Sample) {
        self.samples.lock().insert(sample.id.clone(), sample);
    }

    /// Queue an error to be returned by the next call, ahead of normal
    /// behavior. Script several to simulate an unhealthy stretch.
    pub fn script_failure(&self, error: ClientError) {
        self.scripted.lock().push_back(error);
    }

    pub fn get_sample_call_count(&self) -> usize {
        self.get_sample_calls.load(Ordering::SeqCst)
    }

    pub fn health_call_count(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    fn next_scripted(&self) -> Option<ClientError> {
        self.scripted.lock().pop_front()
    }
}

#[async_trait]
impl ForgeAdapter for MockForgeAdapter {
    fn name(&self) -> &'static str {
        "mock-forge"
    }

    async fn get_sample(&self, sample_id: &str) -> Result<Sample> {
        self.get_sample_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }
        self.samples
            .lock()
            .get(sample_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("sample/{sample_id}"),
            })
    }

    async fn health_check(&self) -> Result<()> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }
        Ok(())
    }
}

struct IssuedAssignment {
    assignment: Assignment,
    user_id: String,
}

/// Deterministic in-memory Anvil. Assignments are handed out queue by queue
/// in insertion order; submission validates values against the checked-out
/// assignment's schema the way the real service does.
#[derive(Default)]
pub struct MockAnvilAdapter {
    queues: Mutex<HashMap<String, VecDeque<Assignment>>>,
    issued: Mutex<HashMap<String, IssuedAssignment>>,
    stats: Mutex<HashMap<String, QueueStats>>,
    submitted: Mutex<Vec<Label>>,
    scripted: Mutex<VecDeque<ClientError>>,
    next_assignment_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    stats_calls: AtomicUsize,
    health_calls: AtomicUsize,
}

impl MockAnvilAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock with `count` fixture assignments waiting in `queue_id`.
    pub fn with_queue(queue_id: &str, count: usize) -> Self {
        let adapter = Self::new();
        for _ in 0..count {
            adapter.push_assignment(fixtures::assignment(queue_id));
        }
        adapter.set_stats(fixtures::queue_stats(queue_id));
        adapter
    }

    pub fn push_assignment(&self, assignment: Assignment) {
        self.queues
            .lock()
            .entry(assignment.queue_id.clone())
            .or_default()
            .push_back(assignment);
    }

    pub fn set_stats(&self, stats: QueueStats) {
        self.stats.lock().insert(stats.queue_id.clone(), stats);
    }

    pub fn script_failure(&self, error: ClientError) {
        self.scripted.lock().push_back(error);
    }

    pub fn next_assignment_call_count(&self) -> usize {
        self.next_assignment_calls.load(Ordering::SeqCst)
    }

    pub fn submit_call_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn stats_call_count(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn health_call_count(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Labels accepted so far, in submission order.
    pub fn submitted_labels(&self) -> Vec<Label> {
        self.submitted.lock().clone()
    }

    fn next_scripted(&self) -> Option<ClientError> {
        self.scripted.lock().pop_front()
    }
}

#[async_trait]
impl AnvilAdapter for MockAnvilAdapter {
    fn name(&self) -> &'static str {
        "mock-anvil"
    }

    async fn get_next_assignment(&self, queue_id: &str, user_id: &str) -> Result<Assignment> {
        self.next_assignment_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }

        let assignment = self
            .queues
            .lock()
            .get_mut(queue_id)
            .and_then(|queue| queue.pop_front());

        match assignment {
            Some(assignment) => {
                self.issued.lock().insert(
                    assignment.id.clone(),
                    IssuedAssignment {
                        assignment: assignment.clone(),
                        user_id: user_id.to_string(),
                    },
                );
                Ok(assignment)
            }
            None => Err(ClientError::NoAssignments {
                queue_id: queue_id.to_string(),
            }),
        }
    }

    async fn submit_label(
        &self,
        assignment_id: &str,
        values: BTreeMap<String, serde_json::Value>,
        elapsed_seconds: f64,
    ) -> Result<Label> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }

        let mut issued = self.issued.lock();
        let Some(checkout) = issued.get(assignment_id) else {
            return Err(ClientError::NotFound {
                resource: format!("assignment/{assignment_id}"),
            });
        };

        let field_errors = checkout.assignment.schema.validate_values(&values);
        if !field_errors.is_empty() {
            return Err(ClientError::Validation {
                fields: field_errors,
            });
        }

        let label = Label {
            id: Uuid::new_v4().to_string(),
            assignment_id: assignment_id.to_string(),
            sample_id: checkout.assignment.sample.id.clone(),
            queue_id: checkout.assignment.queue_id.clone(),
            tenant_id: checkout.assignment.tenant_id.clone(),
            user_id: checkout.user_id.clone(),
            values,
            elapsed_seconds,
            created_at: Utc::now(),
            lineage: checkout.assignment.lineage.clone(),
        };

        // Submission closes the checkout
        issued.remove(assignment_id);
        self.submitted.lock().push(label.clone());
        Ok(label)
    }

    async fn get_queue_stats(&self, queue_id: &str) -> Result<QueueStats> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }
        self.stats
            .lock()
            .get(queue_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                resource: format!("queue/{queue_id}"),
            })
    }

    async fn health_check(&self) -> Result<()> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.next_scripted() {
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_forge_returns_inserted_sample() {
        let forge = MockForgeAdapter::with_fixtures();
        let sample = forge.get_sample("smp-001").await.unwrap();
        assert_eq!(sample.id, "smp-001");
        assert_eq!(forge.get_sample_call_count(), 1);
    }

    #[tokio::test]
    async fn test_forge_unknown_sample_is_not_found() {
        let forge = MockForgeAdapter::new();
        let err = forge.get_sample("smp-missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_scripted_failures_consumed_in_order() {
        let forge = MockForgeAdapter::with_fixtures();
        forge.script_failure(ClientError::Timeout {
            operation: "get_sample".to_string(),
            timeout_ms: 5000,
        });
        forge.script_failure(ClientError::Network {
            operation: "get_sample".to_string(),
            message: "reset".to_string(),
        });

        assert!(matches!(
            forge.get_sample("smp-001").await,
            Err(ClientError::Timeout { .. })
        ));
        assert!(matches!(
            forge.get_sample("smp-001").await,
            Err(ClientError::Network { .. })
        ));
        assert!(forge.get_sample("smp-001").await.is_ok());
        assert_eq!(forge.get_sample_call_count(), 3);
    }

    #[tokio::test]
    async fn test_anvil_hands_out_assignments_until_empty() {
        let anvil = MockAnvilAdapter::with_queue("q-audio", 1);

        let assignment = anvil.get_next_assignment("q-audio", "user-7").await.unwrap();
        assert_eq!(assignment.queue_id, "q-audio");

        let err = anvil.get_next_assignment("q-audio", "user-7").await.unwrap_err();
        assert!(matches!(err, ClientError::NoAssignments { .. }));
    }

    #[tokio::test]
    async fn test_submit_validates_against_schema() {
        let anvil = MockAnvilAdapter::with_queue("q-audio", 1);
        let assignment = anvil.get_next_assignment("q-audio", "user-7").await.unwrap();

        // Missing the required "rating" field
        let err = anvil
            .submit_label(&assignment.id, BTreeMap::new(), 3.0)
            .await
            .unwrap_err();
        match err {
            ClientError::Validation { fields } => assert!(fields.contains_key("rating")),
            other => panic!("expected validation error, got {other:?}"),
        }

        let mut values = BTreeMap::new();
        values.insert("rating".to_string(), json!(4));
        let label = anvil
            .submit_label(&assignment.id, values, 3.0)
            .await
            .unwrap();
        assert_eq!(label.user_id, "user-7");
        assert_eq!(label.queue_id, "q-audio");
        assert_eq!(anvil.submitted_labels().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_against_unknown_assignment() {
        let anvil = MockAnvilAdapter::new();
        let err = anvil
            .submit_label("asn-ghost", BTreeMap::new(), 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stats_satisfy_count_invariant() {
        let anvil = MockAnvilAdapter::with_queue("q-audio", 2);
        let stats = anvil.get_queue_stats("q-audio").await.unwrap();
        assert_eq!(stats.labeled + stats.remaining, stats.total);
    }
}
