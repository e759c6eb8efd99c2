//! # Label Model
//!
//! A submitted label. Write-once from this layer's perspective: submission is
//! a create against an assignment, never an update.

use crate::error::PayloadError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub assignment_id: String,
    pub sample_id: String,
    pub queue_id: String,
    pub tenant_id: String,
    pub user_id: String,
    /// Field name to submitted value, as validated against the schema.
    pub values: BTreeMap<String, serde_json::Value>,
    /// Wall-clock seconds the labeler spent on the assignment, measured by
    /// the caller.
    pub elapsed_seconds: f64,
    pub created_at: DateTime<Utc>,
    pub lineage: Option<String>,
}

impl Label {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|e| PayloadError::new("Label", e.to_string()))
    }
}
