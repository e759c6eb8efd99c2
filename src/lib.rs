#![allow(clippy::doc_markdown)] // Allow technical terms like JSON, URL in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Smithy Core
//!
//! Resilient client layer between the Smithy labeling UI and its two
//! upstream services: **Forge** (sample/artifact source) and **Anvil**
//! (labeling-queue/assignment service).
//!
//! ## Overview
//!
//! The UI never talks to an upstream directly. It calls the two facades in
//! [`clients`], which translate upstream data into the value objects in
//! [`models`], apply the uniform failure policy in [`resilience`] (timeout,
//! bounded retry for idempotent reads, a per-upstream circuit breaker), and
//! normalize every failure into the closed [`error::ClientError`] taxonomy.
//! Which transport actually runs (in-memory mock or HTTP) is purely a
//! [`config`] decision behind the [`adapters`] contract.
//!
//! Per-queue rendering behavior is pluggable: [`components`] resolves a
//! queue's registered rendering component through the queue client, caches
//! the resolution for the process lifetime, and falls back to a generic
//! schema-driven default when a queue names nothing or names something
//! unregistered.
//!
//! ## Module Organization
//!
//! - [`models`] - UI-facing value objects (samples, schemas, assignments,
//!   labels, queue stats)
//! - [`adapters`] - transport contracts plus mock and HTTP implementations
//! - [`resilience`] - circuit breaker, retry policy, timeout wrapper
//! - [`clients`] - the `SampleClient` and `QueueClient` facades
//! - [`components`] - rendering-component contract, registry, and default
//! - [`config`] - environment-driven configuration
//! - [`error`] - the closed error taxonomy
//! - [`logging`] - structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smithy_core::clients::{QueueClient, SampleClient};
//! use smithy_core::config::SmithyConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SmithyConfig::from_env()?;
//! let samples = SampleClient::from_config(&config.forge);
//! let queues = QueueClient::from_config(&config.anvil);
//!
//! let assignment = queues.get_next_assignment("q-audio", "user-7").await?;
//! println!("sample {} awaits labels", assignment.sample.id);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod clients;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod resilience;
pub mod test_utils;

pub use clients::{QueueClient, SampleClient};
pub use components::{ComponentRegistry, DefaultComponent, QueueComponent};
pub use config::{AdapterKind, SmithyConfig, UpstreamConfig};
pub use error::{ClientError, PayloadError, Result};
pub use models::{Assignment, Label, LabelSchema, QueueStats, Sample};
