//! # Configuration
//!
//! Process-level configuration for the client layer: which adapter each
//! upstream uses, plus the resilience policy knobs (timeout, retry, circuit
//! breaker). Read from `SMITHY_*` environment variables at startup, with
//! defaults suitable for local development against the mock adapters.

use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {variable}: {message}")]
    Invalid { variable: String, message: String },
}

/// Which concrete transport an upstream client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdapterKind {
    /// In-memory deterministic adapter. The default, so the crate works with
    /// zero configuration and tests never touch the network.
    #[default]
    Mock,
    Http,
}

impl AdapterKind {
    fn parse(variable: &str, raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "mock" => Ok(AdapterKind::Mock),
            "http" => Ok(AdapterKind::Http),
            other => Err(ConfigError::Invalid {
                variable: variable.to_string(),
                message: format!("unknown adapter '{other}', expected 'mock' or 'http'"),
            }),
        }
    }
}

/// Per-upstream settings: transport selection plus resilience policy.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub adapter: AdapterKind,
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub breaker_failure_threshold: u32,
    pub breaker_cooldown_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::Mock,
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 5000,
            retry_attempts: 3,
            retry_base_delay_ms: 100,
            breaker_failure_threshold: 5,
            breaker_cooldown_ms: 30_000,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_millis(self.breaker_cooldown_ms)
    }

    /// Overlay `SMITHY_<PREFIX>_*` environment variables onto the defaults.
    fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(format!("SMITHY_{prefix}_ADAPTER")) {
            config.adapter = AdapterKind::parse(&format!("SMITHY_{prefix}_ADAPTER"), &raw)?;
        }
        if let Ok(url) = env::var(format!("SMITHY_{prefix}_URL")) {
            config.base_url = url;
        }
        config.timeout_ms = parse_var(&format!("SMITHY_{prefix}_TIMEOUT_MS"), config.timeout_ms)?;
        config.retry_attempts = parse_var(
            &format!("SMITHY_{prefix}_RETRY_ATTEMPTS"),
            config.retry_attempts,
        )?;
        config.retry_base_delay_ms = parse_var(
            &format!("SMITHY_{prefix}_RETRY_BASE_DELAY_MS"),
            config.retry_base_delay_ms,
        )?;
        config.breaker_failure_threshold = parse_var(
            &format!("SMITHY_{prefix}_BREAKER_THRESHOLD"),
            config.breaker_failure_threshold,
        )?;
        config.breaker_cooldown_ms = parse_var(
            &format!("SMITHY_{prefix}_BREAKER_COOLDOWN_MS"),
            config.breaker_cooldown_ms,
        )?;

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(variable: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(variable) {
        Ok(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
            variable: variable.to_string(),
            message: format!("{e}"),
        }),
        Err(_) => Ok(default),
    }
}

/// Top-level configuration: one [`UpstreamConfig`] per upstream service.
#[derive(Debug, Clone, Default)]
pub struct SmithyConfig {
    pub forge: UpstreamConfig,
    pub anvil: UpstreamConfig,
}

impl SmithyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            forge: UpstreamConfig::from_env("FORGE")?,
            anvil: UpstreamConfig::from_env("ANVIL")?,
        })
    }
}
