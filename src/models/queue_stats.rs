//! # Queue Stats Model
//!
//! Point-in-time snapshot of a queue's progress: counts, per-field agreement
//! scores, and the number of labelers currently active.
//!
//! ## Invariant
//!
//! `labeled + remaining == total` holds for every constructed snapshot; a
//! payload that violates it is rejected as malformed rather than silently
//! carried. Snapshots are always stale by at least network latency and are
//! never authoritative.

use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub queue_id: String,
    pub total: u64,
    pub labeled: u64,
    pub remaining: u64,
    /// Inter-labeler agreement score per field, 0.0 to 1.0.
    pub agreement: BTreeMap<String, f64>,
    pub active_labelers: u32,
}

impl QueueStats {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        let stats: QueueStats = serde_json::from_value(value)
            .map_err(|e| PayloadError::new("QueueStats", e.to_string()))?;
        if stats.labeled + stats.remaining != stats.total {
            return Err(PayloadError::new(
                "QueueStats",
                format!(
                    "count invariant violated: labeled {} + remaining {} != total {}",
                    stats.labeled, stats.remaining, stats.total
                ),
            ));
        }
        Ok(stats)
    }

    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.labeled as f64 / self.total as f64 * 100.0
    }
}
