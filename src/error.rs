//! # Client Error Types
//!
//! The closed error taxonomy returned by the client facades. Adapter-native
//! failures are normalized into these variants once, at the adapter boundary,
//! using thiserror for structured error types instead of `Box<dyn Error>`
//! patterns.

use std::collections::BTreeMap;
use thiserror::Error;

/// Closed error taxonomy for all facade operations.
///
/// Application code matches on these variants to pick a user-visible state:
/// `NoAssignments` maps to "nothing to do", `Validation` to inline field
/// errors, everything else to a generic retry-or-support message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    /// The queue has nothing to hand out. Expected, not exceptional.
    #[error("queue '{queue_id}' has no assignments available")]
    NoAssignments { queue_id: String },

    #[error("operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("network failure during '{operation}': {message}")]
    Network { operation: String, message: String },

    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Submitted values failed schema validation, keyed by field name.
    #[error("validation failed for {} field(s)", .fields.len())]
    Validation { fields: BTreeMap<String, String> },

    /// The circuit breaker for the upstream is open. No call was attempted.
    #[error("circuit breaker is open for {component}")]
    CircuitOpen { component: String },

    /// Catch-all for anything the adapter could not classify. Always logged,
    /// never silently swallowed.
    #[error("unexpected error: {detail}")]
    Unexpected { detail: String },
}

impl ClientError {
    /// Whether the resilience wrapper may retry an idempotent read that
    /// failed with this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout { .. } | ClientError::Network { .. }
        )
    }

    /// Whether this error counts against the circuit breaker's failure
    /// threshold. Domain outcomes (not-found, empty queue, validation,
    /// unauthorized) are valid upstream responses, not upstream failures.
    pub fn is_breaker_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout { .. }
                | ClientError::Network { .. }
                | ClientError::Unexpected { .. }
        )
    }

    /// Convenience constructor for a single-field validation error.
    pub fn validation_field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.to_string());
        ClientError::Validation { fields }
    }

    /// Short stable tag for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::NotFound { .. } => "not_found",
            ClientError::NoAssignments { .. } => "no_assignments",
            ClientError::Timeout { .. } => "timeout",
            ClientError::Network { .. } => "network",
            ClientError::Unauthorized { .. } => "unauthorized",
            ClientError::Validation { .. } => "validation",
            ClientError::CircuitOpen { .. } => "circuit_open",
            ClientError::Unexpected { .. } => "unexpected",
        }
    }
}

/// Raised when a DTO cannot be constructed from an adapter-provided raw
/// payload. DTO constructors either succeed with every required field
/// populated or fail with this; a partially-populated object is never produced.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed {dto} payload: {detail}")]
pub struct PayloadError {
    pub dto: &'static str,
    pub detail: String,
}

impl PayloadError {
    pub fn new(dto: &'static str, detail: impl Into<String>) -> Self {
        Self {
            dto,
            detail: detail.into(),
        }
    }
}

impl From<PayloadError> for ClientError {
    fn from(err: PayloadError) -> Self {
        ClientError::Unexpected {
            detail: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
