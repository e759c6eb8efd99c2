//! # Component Infrastructure
//!
//! Pluggable per-queue rendering modules and their resolution.
//!
//! ## Overview
//!
//! A labeling queue may name a custom rendering component for its samples and
//! label forms. Components are ordinary Rust types implementing the traits in
//! [`contract`], registered by name in an explicit table at process start:
//! a typed registry instead of reflection-based module loading, so contract
//! verification is the trait bound at compile time and only "was this name
//! registered" remains a runtime question.
//!
//! ## Resolution
//!
//! [`registry::ComponentRegistry`] maps a queue identifier to a component by
//! consulting the queue client once, caches the result for the process
//! lifetime, and degrades to [`default::DefaultComponent`] whenever a queue
//! names nothing or names something unregistered. A missing or broken
//! component is never an error for the caller; upstream unavailability is.

pub mod contract;
pub mod default;
pub mod registry;

pub use contract::{
    ComponentAssets, ComponentCapabilities, LabelFormRenderer, QueueComponent, RenderOptions,
    SampleRenderer,
};
pub use default::DefaultComponent;
pub use registry::ComponentRegistry;
