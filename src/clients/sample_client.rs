//! # Sample Client
//!
//! Facade over the Forge sample service. Holds the configured adapter
//! (mock when unset) behind the Forge resilience wrapper.

use std::sync::Arc;

use tracing::info;

use crate::adapters::{ForgeAdapter, HttpForgeAdapter, MockForgeAdapter};
use crate::clients::log_outcome;
use crate::config::{AdapterKind, UpstreamConfig};
use crate::error::Result;
use crate::models::Sample;
use crate::resilience::{CircuitState, Resilience};

pub const UPSTREAM: &str = "forge";

pub struct SampleClient {
    adapter: Arc<dyn ForgeAdapter>,
    resilience: Resilience,
}

impl SampleClient {
    /// Wrap an explicit adapter. Tests inject mocks here.
    pub fn new(adapter: Arc<dyn ForgeAdapter>, config: &UpstreamConfig) -> Self {
        Self {
            resilience: Resilience::from_config(UPSTREAM, config),
            adapter,
        }
    }

    /// Select the adapter from configuration.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let adapter: Arc<dyn ForgeAdapter> = match config.adapter {
            AdapterKind::Mock => Arc::new(MockForgeAdapter::with_fixtures()),
            AdapterKind::Http => Arc::new(HttpForgeAdapter::new(&config.base_url, config.timeout())),
        };
        info!(
            component = UPSTREAM,
            adapter = adapter.name(),
            base_url = %config.base_url,
            "🔌 Sample client configured"
        );
        Self::new(adapter, config)
    }

    /// Fetch one sample. Idempotent read: retried on timeout/network.
    pub async fn get_sample(&self, sample_id: &str) -> Result<Sample> {
        let result = self
            .resilience
            .read("get_sample", || self.adapter.get_sample(sample_id))
            .await;
        log_outcome(UPSTREAM, "get_sample", &result);
        result
    }

    /// Liveness probe: timeout-bounded, no retry, breaker bypassed.
    pub async fn health_check(&self) -> Result<()> {
        let result = self
            .resilience
            .probe("health_check", self.adapter.health_check())
            .await;
        log_outcome(UPSTREAM, "health_check", &result);
        result
    }

    /// Current breaker state for the Forge upstream, for health surfaces.
    pub fn breaker_state(&self) -> CircuitState {
        self.resilience.breaker_state()
    }
}
