//! # Adapter Contracts
//!
//! The traits each concrete transport must satisfy, one per upstream
//! service. Adapters own exactly one job: translate a call into their
//! transport and map transport-native failures into the closed
//! [`crate::error::ClientError`] taxonomy. Normalization happens here, once;
//! nothing above this boundary sees a raw transport error.
//!
//! Concrete implementations:
//!
//! - [`mock`]: in-memory deterministic adapters with scripted failures and
//!   call counters. The configuration default; also the test stub.
//! - [`http`]: reqwest-based adapters for real Forge/Anvil deployments.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{Assignment, Label, QueueStats, Sample};

pub mod http;
pub mod mock;

pub use http::{HttpAnvilAdapter, HttpForgeAdapter};
pub use mock::{MockAnvilAdapter, MockForgeAdapter};

/// Transport contract for Forge, the sample/artifact source.
#[async_trait]
pub trait ForgeAdapter: Send + Sync {
    /// Adapter identity for logs.
    fn name(&self) -> &'static str;

    /// Fetch one sample by identifier.
    async fn get_sample(&self, sample_id: &str) -> Result<Sample>;

    /// Cheap liveness probe. Must return quickly and without side effects.
    async fn health_check(&self) -> Result<()>;
}

/// Transport contract for Anvil, the labeling-queue/assignment service.
#[async_trait]
pub trait AnvilAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Check the next assignment out of a queue for a user. Returns
    /// `NoAssignments` when the queue has nothing to hand out.
    async fn get_next_assignment(&self, queue_id: &str, user_id: &str) -> Result<Assignment>;

    /// Create a label against a checked-out assignment. Returns `Validation`
    /// when the values fail the assignment's schema. Not idempotent; the
    /// resilience layer never auto-retries it.
    async fn submit_label(
        &self,
        assignment_id: &str,
        values: BTreeMap<String, serde_json::Value>,
        elapsed_seconds: f64,
    ) -> Result<Label>;

    /// Snapshot of queue progress counts and agreement scores.
    async fn get_queue_stats(&self, queue_id: &str) -> Result<QueueStats>;

    async fn health_check(&self) -> Result<()>;
}
