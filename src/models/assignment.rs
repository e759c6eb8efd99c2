//! # Assignment Model
//!
//! One unit of labeling work handed out by Anvil: a queue, a sample, and the
//! schema to label it with, plus any prior labels for review flows.
//!
//! Anvil checks an assignment out to a user until it is submitted, skipped,
//! or expired. This layer does not enforce that lifecycle; it only carries
//! the identifiers needed to submit against the checkout.

use crate::error::PayloadError;
use crate::models::{Label, LabelSchema, Sample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub queue_id: String,
    pub tenant_id: String,
    pub namespace: String,
    pub sample: Sample,
    pub schema: LabelSchema,
    /// Pre-existing labels on the same sample, present in review queues.
    pub prior_labels: Vec<Label>,
    pub expires_at: Option<DateTime<Utc>>,
    pub lineage: Option<String>,
    /// Free-form queue metadata. May carry the rendering-component name under
    /// the `component` key when the schema does not name one.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Assignment {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|e| PayloadError::new("Assignment", e.to_string()))
    }

    /// The rendering-component name this assignment asks for, if any. The
    /// schema's own reference wins over queue metadata.
    pub fn component_name(&self) -> Option<&str> {
        self.schema
            .component
            .as_deref()
            .or_else(|| self.metadata.get("component").and_then(|v| v.as_str()))
    }
}
