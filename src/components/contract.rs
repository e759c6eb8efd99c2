//! # Component Contract
//!
//! The two cooperating interfaces a rendering module implements, plus the
//! capability descriptor for its optional hooks. A type satisfies the
//! contract by implementing both render traits; [`QueueComponent`] bundles
//! them for registry storage. Optional behavior is declared once in
//! [`ComponentCapabilities`] rather than probed per call.

use std::collections::BTreeMap;

use crate::models::{LabelSchema, Sample};

/// Rendering context passed through from the UI layer.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render for display only (review flows): inputs disabled, no hooks.
    pub read_only: bool,
}

/// Extra UI assets a component needs injected into the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentAssets {
    pub css: Vec<String>,
    pub js: Vec<String>,
    pub hook_names: Vec<String>,
}

/// Which optional hooks a component provides. Declared once; the registry
/// logs it at registration and callers consult it instead of probing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentCapabilities {
    /// Implements [`SampleRenderer::preprocess_sample`].
    pub preprocess: bool,
    /// Implements [`LabelFormRenderer::validate_label`].
    pub validate: bool,
}

/// Renders a sample for display.
pub trait SampleRenderer {
    /// Produce markup for the sample. Must be a pure function of its inputs
    /// and must succeed for any valid sample.
    fn render_sample(&self, sample: &Sample, options: &RenderOptions) -> String;

    fn required_assets(&self) -> ComponentAssets {
        ComponentAssets::default()
    }

    /// Expensive one-time parsing of a sample, cached by the caller for the
    /// life of the assignment. Only called when the component declares the
    /// `preprocess` capability.
    fn preprocess_sample(&self, _sample: &Sample) -> Option<serde_json::Value> {
        None
    }
}

/// Renders the label-input form for a schema.
pub trait LabelFormRenderer {
    /// Produce markup for the form, pre-filled from `current_values`. Must
    /// be a pure function of its inputs and succeed for any valid schema.
    fn render_label_form(
        &self,
        schema: &LabelSchema,
        current_values: &BTreeMap<String, serde_json::Value>,
        options: &RenderOptions,
    ) -> String;

    /// Domain-specific cross-field validation beyond the generic schema
    /// checks. Only called when the component declares the `validate`
    /// capability. `Err` carries one message per failing field.
    fn validate_label(
        &self,
        _values: &BTreeMap<String, serde_json::Value>,
        _schema: &LabelSchema,
    ) -> Result<(), BTreeMap<String, String>> {
        Ok(())
    }
}

/// A registrable rendering module: both render contracts plus identity and
/// capability declaration. The trait bound is the contract verification:
/// anything in the registration table is known-good at compile time.
pub trait QueueComponent: SampleRenderer + LabelFormRenderer + Send + Sync {
    /// Stable name queue metadata refers to this component by.
    fn component_name(&self) -> &'static str;

    fn capabilities(&self) -> ComponentCapabilities {
        ComponentCapabilities::default()
    }
}
