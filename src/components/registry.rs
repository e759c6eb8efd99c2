//! # Component Registry
//!
//! Maps a queue identifier to its rendering component, safely, with caching.
//!
//! ## Resolution
//!
//! On a cache miss the registry asks the queue client for the queue's next
//! assignment and reads the component name from it (schema first, then queue
//! metadata). An empty queue means "nothing custom configured" and resolves
//! to the default component; an empty queue is not an error state for
//! resolution purposes. Any other upstream error propagates to the caller
//! uncached: a transient failure to resolve must not be cached as permanent,
//! and no rendering decision can be made safely without queue metadata.
//!
//! A name that is not in the registration table degrades to the default
//! component with a warning; it never fails the caller.
//!
//! ## Caching
//!
//! Resolutions are cached per queue with no TTL; staleness is the accepted
//! price for paying the resolution cost once per queue per process lifetime.
//! Invalidation is explicit (one entry or all), used when a component is
//! redeployed and in tests. Duplicate concurrent resolutions for one queue
//! are harmless, so the cache is a concurrent map without per-key locking.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::clients::QueueClient;
use crate::components::contract::QueueComponent;
use crate::components::default::DefaultComponent;
use crate::error::{ClientError, Result};

/// Reserved user identity for resolution checkouts. Anvil expires the
/// checkout like any other abandoned assignment.
pub const RESOLVER_USER: &str = "smithy-component-resolver";

pub struct ComponentRegistry {
    queue_client: Arc<QueueClient>,
    /// Name to component, built at process start. Registration is the only
    /// write; resolution reads it immutably.
    registrations: HashMap<String, Arc<dyn QueueComponent>>,
    /// Queue id to resolved component.
    cache: DashMap<String, Arc<dyn QueueComponent>>,
    default_component: Arc<dyn QueueComponent>,
}

impl ComponentRegistry {
    pub fn new(queue_client: Arc<QueueClient>) -> Self {
        Self {
            queue_client,
            registrations: HashMap::new(),
            cache: DashMap::new(),
            default_component: Arc::new(DefaultComponent),
        }
    }

    /// Add a component to the registration table under its own name. The
    /// trait bound has already verified the contract; capabilities are
    /// recorded here, once, instead of probed per call.
    pub fn register(&mut self, component: Arc<dyn QueueComponent>) {
        let name = component.component_name();
        let capabilities = component.capabilities();
        info!(
            component = name,
            preprocess = capabilities.preprocess,
            validate = capabilities.validate,
            "📚 Component registered"
        );
        self.registrations.insert(name.to_string(), component);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    pub fn default_component(&self) -> Arc<dyn QueueComponent> {
        self.default_component.clone()
    }

    /// Resolve the rendering component for a queue.
    pub async fn get_component(&self, queue_id: &str) -> Result<Arc<dyn QueueComponent>> {
        if let Some(cached) = self.cache.get(queue_id) {
            debug!(queue_id = %queue_id, "Component cache hit");
            return Ok(cached.clone());
        }

        let assignment = match self
            .queue_client
            .get_next_assignment(queue_id, RESOLVER_USER)
            .await
        {
            Ok(assignment) => Some(assignment),
            // Empty queue: nothing custom configured, and cacheable as such
            Err(ClientError::NoAssignments { .. }) => None,
            Err(err) => {
                warn!(
                    queue_id = %queue_id,
                    kind = err.kind(),
                    error = %err,
                    "Component resolution failed: queue metadata unavailable"
                );
                return Err(err);
            }
        };

        let resolved = match assignment.as_ref().and_then(|a| a.component_name()) {
            None => self.default_component.clone(),
            Some(name) => match self.registrations.get(name) {
                Some(component) => {
                    debug!(queue_id = %queue_id, component = name, "Resolved registered component");
                    component.clone()
                }
                None => {
                    warn!(
                        queue_id = %queue_id,
                        component = name,
                        "⚠️ Queue names an unregistered component; falling back to default"
                    );
                    self.default_component.clone()
                }
            },
        };

        self.cache.insert(queue_id.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Drop the cached resolution for one queue.
    pub fn invalidate(&self, queue_id: &str) {
        if self.cache.remove(queue_id).is_some() {
            info!(queue_id = %queue_id, "Component cache entry invalidated");
        }
    }

    /// Drop every cached resolution.
    pub fn invalidate_all(&self) {
        let entries = self.cache.len();
        self.cache.clear();
        info!(entries = entries, "Component cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAnvilAdapter;
    use crate::components::contract::{
        ComponentCapabilities, LabelFormRenderer, RenderOptions, SampleRenderer,
    };
    use crate::config::UpstreamConfig;
    use crate::models::{LabelSchema, Sample};
    use crate::test_utils::fixtures;
    use std::collections::BTreeMap;

    struct WaveformComponent;

    impl SampleRenderer for WaveformComponent {
        fn render_sample(&self, sample: &Sample, _options: &RenderOptions) -> String {
            format!("<canvas class=\"waveform\" data-sample=\"{}\"></canvas>", sample.id)
        }

        fn preprocess_sample(&self, sample: &Sample) -> Option<serde_json::Value> {
            Some(serde_json::json!({ "peaks": [], "source": sample.id }))
        }
    }

    impl LabelFormRenderer for WaveformComponent {
        fn render_label_form(
            &self,
            _schema: &LabelSchema,
            _current_values: &BTreeMap<String, serde_json::Value>,
            _options: &RenderOptions,
        ) -> String {
            "<form class=\"waveform-form\"></form>".to_string()
        }
    }

    impl QueueComponent for WaveformComponent {
        fn component_name(&self) -> &'static str {
            "waveform-viewer"
        }

        fn capabilities(&self) -> ComponentCapabilities {
            ComponentCapabilities {
                preprocess: true,
                validate: false,
            }
        }
    }

    fn registry_with(anvil: Arc<MockAnvilAdapter>) -> ComponentRegistry {
        let client = Arc::new(QueueClient::new(anvil, &UpstreamConfig::default()));
        let mut registry = ComponentRegistry::new(client);
        registry.register(Arc::new(WaveformComponent));
        registry
    }

    #[tokio::test]
    async fn test_resolves_registered_component_from_schema() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        anvil.push_assignment(fixtures::assignment_with_component(
            "q-audio",
            "waveform-viewer",
        ));
        let registry = registry_with(anvil);

        let component = registry.get_component("q-audio").await.unwrap();
        assert_eq!(component.component_name(), "waveform-viewer");
    }

    #[tokio::test]
    async fn test_unregistered_name_falls_back_to_default_and_caches() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        anvil.push_assignment(fixtures::assignment_with_component("q-video", "hologram"));
        let registry = registry_with(anvil.clone());

        let component = registry.get_component("q-video").await.unwrap();
        assert_eq!(component.component_name(), "default");
        let calls_after_first = anvil.next_assignment_call_count();

        // Second lookup is served from cache: zero additional upstream calls
        let component = registry.get_component("q-video").await.unwrap();
        assert_eq!(component.component_name(), "default");
        assert_eq!(anvil.next_assignment_call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn test_empty_queue_resolves_default_and_caches() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        let registry = registry_with(anvil.clone());

        let component = registry.get_component("q-empty").await.unwrap();
        assert_eq!(component.component_name(), "default");
        assert_eq!(anvil.next_assignment_call_count(), 1);

        let _ = registry.get_component("q-empty").await.unwrap();
        assert_eq!(anvil.next_assignment_call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_and_is_not_cached() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        anvil.script_failure(ClientError::Unauthorized {
            message: "token expired".to_string(),
        });
        anvil.push_assignment(fixtures::assignment_with_component(
            "q-audio",
            "waveform-viewer",
        ));
        let registry = registry_with(anvil);

        let err = registry.get_component("q-audio").await.err().unwrap();
        assert!(matches!(err, ClientError::Unauthorized { .. }));

        // Transient failure was not cached: the retry resolves for real
        let component = registry.get_component("q-audio").await.unwrap();
        assert_eq!(component.component_name(), "waveform-viewer");
    }

    #[tokio::test]
    async fn test_invalidate_is_per_queue() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        let registry = registry_with(anvil.clone());

        let _ = registry.get_component("q-a").await.unwrap();
        let _ = registry.get_component("q-b").await.unwrap();
        assert_eq!(anvil.next_assignment_call_count(), 2);

        registry.invalidate("q-a");

        // q-b still cached, q-a re-resolves
        let _ = registry.get_component("q-b").await.unwrap();
        assert_eq!(anvil.next_assignment_call_count(), 2);
        let _ = registry.get_component("q-a").await.unwrap();
        assert_eq!(anvil.next_assignment_call_count(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_all_forces_re_resolution() {
        let anvil = Arc::new(MockAnvilAdapter::new());
        let registry = registry_with(anvil.clone());

        let _ = registry.get_component("q-a").await.unwrap();
        registry.invalidate_all();
        let _ = registry.get_component("q-a").await.unwrap();
        assert_eq!(anvil.next_assignment_call_count(), 2);
    }
}
