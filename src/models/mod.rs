//! # Model Layer
//!
//! UI-facing value objects for the Forge and Anvil upstreams. These are plain
//! data records: no callable behavior beyond fallible construction from raw
//! adapter payloads and a few read-only accessors.
//!
//! Every model is built through `from_value`, which either succeeds with all
//! required fields populated or fails with a [`crate::error::PayloadError`].
//! A partially-populated model is never produced.

pub mod assignment;
pub mod label;
pub mod queue_stats;
pub mod sample;
pub mod schema;

// Re-export core models for easy access
pub use assignment::Assignment;
pub use label::Label;
pub use queue_stats::QueueStats;
pub use sample::{Artifact, ArtifactKind, Sample};
pub use schema::{Field, FieldKind, LabelSchema};
