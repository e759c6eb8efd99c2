//! # Test Utilities
//!
//! Shared fixtures and environment helpers used by the mock adapters, the
//! unit tests, and the integration suites. Kept in the library so dependent
//! crates can drive the mock adapters with the same data.

use chrono::{DateTime, Utc};
use std::env;

/// Set up common test environment variables if not already present, so tests
/// behave the same locally and in CI.
pub fn setup_test_environment() {
    if env::var("SMITHY_ENV").is_err() {
        env::set_var("SMITHY_ENV", "test");
    }
}

/// Canonical fixture data: one audio sample, one rating schema, and
/// assignments/stats derived from them.
pub mod fixtures {
    use super::*;
    use crate::models::{Artifact, Assignment, Field, LabelSchema, QueueStats, Sample};
    use serde_json::json;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn fixture_time() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().expect("fixture timestamp")
    }

    /// Raw Forge payload for the standard fixture sample.
    pub fn raw_sample() -> serde_json::Value {
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

    pub fn sample() -> Sample {
        Sample {
            id: "smp-001".to_string(),
            pipeline_id: "pipe-audio".to_string(),
            payload: json!({"transcript": "hello forge"}),
            artifacts: vec![Artifact {
                id: "art-001".to_string(),
                sample_id: "smp-001".to_string(),
                kind_tag: "audio".to_string(),
                url: "https://forge.example/signed/art-001".to_string(),
                filename: "clip.wav".to_string(),
                size_bytes: 44100,
                content_type: "audio/wav".to_string(),
            }],
            metadata: BTreeMap::from([("source".to_string(), json!("batch-7"))]),
            created_at: fixture_time(),
        }
    }

    fn field(name: &str, field_type: &str, required: bool) -> Field {
        Field {
            name: name.to_string(),
            field_type: field_type.to_string(),
            required,
            min: None,
            max: None,
            default: None,
            options: None,
            help_text: None,
        }
    }

    /// The standard rating schema: one required scale field, one optional
    /// text field.
    pub fn schema() -> LabelSchema {
        let mut rating = field("rating", "scale", true);
        rating.min = Some(1.0);
        rating.max = Some(5.0);
        rating.help_text = Some("1 = unusable, 5 = studio quality".to_string());

        LabelSchema {
            name: "audio-quality-v2".to_string(),
            fields: vec![rating, field("notes", "text", false)],
            component: None,
        }
    }

    /// One field of every kind the default component renders, including an
    /// unknown type tag.
    pub fn kitchen_sink_schema() -> LabelSchema {
        let mut rating = field("rating", "scale", true);
        rating.min = Some(1.0);
        rating.max = Some(5.0);

        let mut genre = field("genre", "select", false);
        genre.options = Some(vec!["speech".to_string(), "music".to_string()]);

        LabelSchema {
            name: "kitchen-sink".to_string(),
            fields: vec![
                rating,
                field("usable", "boolean", false),
                genre,
                field("notes", "text", false),
                field("region", "bounding_box", false),
            ],
            component: None,
        }
    }

    /// Raw Anvil payload for an assignment, with fixed identifiers for
    /// deterministic assertions.
    pub fn raw_assignment(queue_id: &str) -> serde_json::Value {
        json!({
            "id": "asn-001",
            "queue_id": queue_id,
            "tenant_id": "acme",
            "namespace": "audio",
            "sample": raw_sample(),
            "schema": {
                "name": "audio-quality-v2",
                "fields": [
                    {
                        "name": "rating",
                        "type": "scale",
                        "required": true,
                        "min": 1.0,
                        "max": 5.0,
                        "default": null,
                        "options": null,
                        "help_text": "1 = unusable, 5 = studio quality"
                    },
                    {
                        "name": "notes",
                        "type": "text",
                        "required": false,
                        "min": null,
                        "max": null,
                        "default": null,
                        "options": null,
                        "help_text": null
                    }
                ],
                "component": null
            },
            "prior_labels": [],
            "expires_at": null,
            "lineage": null,
            "metadata": {}
        })
    }

    /// An assignment with a unique id, for queueing several at once.
    pub fn assignment(queue_id: &str) -> Assignment {
        Assignment {
            id: format!("asn-{}", Uuid::new_v4()),
            queue_id: queue_id.to_string(),
            tenant_id: "acme".to_string(),
            namespace: "audio".to_string(),
            sample: sample(),
            schema: schema(),
            prior_labels: Vec::new(),
            expires_at: None,
            lineage: None,
            metadata: BTreeMap::new(),
        }
    }

    /// An assignment whose schema names a rendering component.
    pub fn assignment_with_component(queue_id: &str, component: &str) -> Assignment {
        let mut assignment = self::assignment(queue_id);
        assignment.schema.component = Some(component.to_string());
        assignment
    }

    pub fn queue_stats(queue_id: &str) -> QueueStats {
        QueueStats {
            queue_id: queue_id.to_string(),
            total: 10,
            labeled: 4,
            remaining: 6,
            agreement: BTreeMap::from([("rating".to_string(), 0.9)]),
            active_labelers: 2,
        }
    }
}
