//! # Client Facades
//!
//! The only objects application code calls. Each facade pairs one configured
//! adapter with the resilience wrapper for its upstream and guarantees:
//!
//! - every error returned is from the closed [`crate::error::ClientError`]
//!   taxonomy, never a raw transport error;
//! - every success is a fully-populated model;
//! - calls are safe to make concurrently: the facade holds no per-call
//!   mutable state, only the breaker inside the wrapper is shared.

use tracing::{debug, error};

use crate::error::{ClientError, Result};

pub mod queue_client;
pub mod sample_client;

pub use queue_client::QueueClient;
pub use sample_client::SampleClient;

/// Outcome logging shared by both facades. `Unexpected` is always logged at
/// error level: it is the catch-all and must never pass silently.
pub(crate) fn log_outcome<T>(component: &str, operation: &str, result: &Result<T>) {
    match result {
        Ok(_) => debug!(component = %component, operation = %operation, "upstream call succeeded"),
        Err(err @ ClientError::Unexpected { .. }) => error!(
            component = %component,
            operation = %operation,
            error = %err,
            "❌ Unclassified upstream failure"
        ),
        Err(err) => debug!(
            component = %component,
            operation = %operation,
            kind = err.kind(),
            error = %err,
            "upstream call returned error"
        ),
    }
}
