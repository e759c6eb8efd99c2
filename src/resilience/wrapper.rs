//! # Resilience Wrapper
//!
//! Applies the full cross-cutting policy to an adapter call: circuit breaker
//! admission, timeout enforcement, and (for idempotent reads) bounded retry
//! with linear backoff. One instance per upstream, holding that upstream's
//! breaker; the wrapper itself is a stateless decorator around it.
//!
//! Breaker admission applies per attempt, so a breaker that opens mid-retry
//! short-circuits the remaining attempts. Non-idempotent operations go
//! through [`Resilience::write`], which never retries: a duplicate
//! submission must not be introduced silently by this layer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::error::{ClientError, Result};
use crate::resilience::{CircuitBreaker, CircuitBreakerConfig, CircuitState, RetryPolicy};

#[derive(Debug, Clone)]
pub struct Resilience {
    upstream: String,
    call_timeout: Duration,
    retry: RetryPolicy,
    breaker: Arc<CircuitBreaker>,
}

impl Resilience {
    /// Build the wrapper and its breaker from an upstream's configuration.
    pub fn from_config(upstream: &str, config: &UpstreamConfig) -> Self {
        let breaker = CircuitBreaker::new(
            upstream,
            CircuitBreakerConfig {
                failure_threshold: config.breaker_failure_threshold,
                cooldown: config.breaker_cooldown(),
            },
        );
        Self {
            upstream: upstream.to_string(),
            call_timeout: config.timeout(),
            retry: RetryPolicy::new(config.retry_attempts, config.retry_base_delay()),
            breaker: Arc::new(breaker),
        }
    }

    /// Share an existing breaker, so several wrappers (or tests) observe the
    /// same process-wide state for one upstream.
    pub fn with_breaker(
        upstream: &str,
        call_timeout: Duration,
        retry: RetryPolicy,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            upstream: upstream.to_string(),
            call_timeout,
            retry,
            breaker,
        }
    }

    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Run an idempotent read with breaker + timeout + retry.
    pub async fn read<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match self.attempt(operation, call()).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retry.attempts => {
                    let delay = self.retry.backoff_delay(attempt);
                    warn!(
                        component = %self.upstream,
                        operation = %operation,
                        attempt = attempt,
                        max_attempts = self.retry.attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "🔁 Retrying idempotent read after backoff"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run a non-idempotent operation with breaker + timeout, exactly once.
    pub async fn write<T, Fut>(&self, operation: &str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.attempt(operation, call).await
    }

    /// Run a health probe with timeout only. Probes bypass retry and the
    /// breaker: they are the observation channel, and short-circuiting them
    /// would hide recovery from the operator.
    pub async fn probe<T, Fut>(&self, operation: &str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        self.bounded(operation, call).await
    }

    async fn attempt<T, Fut>(&self, operation: &str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        if !self.breaker.try_acquire() {
            debug!(
                component = %self.upstream,
                operation = %operation,
                "⚡ Short-circuited: breaker open, no upstream call made"
            );
            return Err(ClientError::CircuitOpen {
                component: self.upstream.clone(),
            });
        }

        let result = self.bounded(operation, call).await;

        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(err) if err.is_breaker_failure() => self.breaker.record_failure(),
            // Domain outcomes mean the upstream answered; the breaker counts
            // them as contact, not failure
            Err(_) => self.breaker.record_success(),
        }

        result
    }

    async fn bounded<T, Fut>(&self, operation: &str, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout {
                operation: operation.to_string(),
                timeout_ms: self.call_timeout.as_millis() as u64,
            }),
        }
    }
}
