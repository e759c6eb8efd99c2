//! # Sample Model
//!
//! Read-only view of a sample produced by the Forge pipeline service.
//!
//! ## Overview
//!
//! A `Sample` is one unit of source data awaiting labels: an opaque JSON
//! payload plus an ordered list of artifacts (media files reachable through
//! time-limited signed URLs). Samples are created upstream and are immutable
//! from this layer's perspective.
//!
//! Artifact URLs carry an external expiry that Forge enforces; this layer
//! never caches a `Sample` past a UI session lifetime.

use crate::error::PayloadError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of source data from Forge, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub pipeline_id: String,
    /// Opaque payload. The shape is owned by the producing pipeline; this
    /// layer carries it through without interpretation.
    pub payload: serde_json::Value,
    pub artifacts: Vec<Artifact>,
    pub metadata: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Sample {
    /// Construct from a raw adapter payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|e| PayloadError::new("Sample", e.to_string()))
    }
}

/// A media file attached to a sample, addressed by a signed URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub sample_id: String,
    /// Type tag as reported by Forge. Stored verbatim so round-trips are
    /// exact even for tags this crate does not recognize; interpret through
    /// [`Artifact::kind`].
    #[serde(rename = "kind")]
    pub kind_tag: String,
    pub url: String,
    pub filename: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl Artifact {
    pub fn from_value(value: serde_json::Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|e| PayloadError::new("Artifact", e.to_string()))
    }

    /// Parsed artifact kind, falling back to [`ArtifactKind::Other`] for
    /// unrecognized tags.
    pub fn kind(&self) -> ArtifactKind {
        ArtifactKind::parse(&self.kind_tag)
    }
}

/// Known artifact kinds. Rendering code switches on this; unknown tags fall
/// through to a generic download link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Audio,
    Json,
    Binary,
    Other,
}

impl ArtifactKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "image" => ArtifactKind::Image,
            "audio" => ArtifactKind::Audio,
            "json" => ArtifactKind::Json,
            "binary" => ArtifactKind::Binary,
            _ => ArtifactKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_sample() -> serde_json::Value {
        json!({
            "id": "smp-001",
            "pipeline_id": "pipe-audio",
            "payload": {"transcript": "hello forge"},
            "artifacts": [{
                "id": "art-001",
                "sample_id": "smp-001",
                "kind": "audio",
                "url": "https://forge.example/signed/art-001",
                "filename": "clip.wav",
                "size_bytes": 44100,
                "content_type": "audio/wav"
            }],
            "metadata": {"source": "batch-7"},
            "created_at": "2026-03-01T12:00:00Z"
        })
    }

    #[test]
    fn test_sample_from_value() {
        let sample = Sample::from_value(raw_sample()).unwrap();
        assert_eq!(sample.id, "smp-001");
        assert_eq!(sample.artifacts.len(), 1);
        assert_eq!(sample.artifacts[0].kind(), ArtifactKind::Audio);
    }

    #[test]
    fn test_sample_missing_field_is_malformed() {
        let mut raw = raw_sample();
        raw.as_object_mut().unwrap().remove("pipeline_id");
        let err = Sample::from_value(raw).unwrap_err();
        assert_eq!(err.dto, "Sample");
        assert!(err.detail.contains("pipeline_id"));
    }

    #[test]
    fn test_unknown_artifact_kind_round_trips() {
        let raw = json!({
            "id": "art-9",
            "sample_id": "smp-9",
            "kind": "pointcloud",
            "url": "https://forge.example/signed/art-9",
            "filename": "scan.pcd",
            "size_bytes": 1024,
            "content_type": "application/octet-stream"
        });
        let artifact = Artifact::from_value(raw.clone()).unwrap();
        assert_eq!(artifact.kind(), ArtifactKind::Other);
        assert_eq!(serde_json::to_value(&artifact).unwrap(), raw);
    }
}
