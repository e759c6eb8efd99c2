//! # Circuit Breaker Implementation
//!
//! Fault isolation for upstream services following the classic circuit
//! breaker pattern with three states: Closed (normal operation), Open
//! (failing fast), and Half-Open (testing recovery with a single probe).
//!
//! One breaker instance exists per upstream service, constructed at startup
//! and shared across all callers via `Arc`. The is-open check on the hot path
//! is a single atomic load; the transition bookkeeping sits behind a mutex
//! that is only taken when state can actually change.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Circuit breaker states representing the current operational mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation - all calls are allowed through
    Closed = 0,
    /// Failure mode - all calls fail fast without executing
    Open = 1,
    /// Testing recovery - exactly one probe call allowed through
    HalfOpen = 2,
}

impl From<u8> for CircuitState {
    fn from(value: u8) -> Self {
        match value {
            0 => CircuitState::Closed,
            2 => CircuitState::HalfOpen,
            // Default to the safest state
            _ => CircuitState::Open,
        }
    }
}

/// Breaker thresholds, derived from the upstream's
/// [`crate::config::UpstreamConfig`].
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive classified failures that trip the breaker open.
    pub failure_threshold: u32,
    /// How long the breaker stays open before admitting a probe.
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    probe_in_flight: bool,
}

/// Core circuit breaker with atomic state reads and serialized transitions.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Upstream name for logging
    name: String,

    /// Current circuit state (atomic so the closed fast path never locks)
    state: AtomicU8,

    config: CircuitBreakerConfig,

    /// Transition bookkeeping, mutated only on call outcomes
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        info!(
            component = %name,
            failure_threshold = config.failure_threshold,
            cooldown_ms = config.cooldown.as_millis() as u64,
            "🛡️ Circuit breaker initialized"
        );

        Self {
            name,
            state: AtomicU8::new(CircuitState::Closed as u8),
            config,
            inner: Mutex::new(BreakerInner {
                consecutive_failures: 0,
                opened_at: None,
                probe_in_flight: false,
            }),
        }
    }

    /// Get current circuit state
    pub fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    /// Whether a call may proceed right now.
    ///
    /// Closed is the lock-free fast path. Open admits nothing until the
    /// cool-down elapses, at which point the caller that observes the elapsed
    /// timer becomes the single half-open probe.
    pub fn try_acquire(&self) -> bool {
        if self.state() == CircuitState::Closed {
            return true;
        }

        let mut inner = self.inner.lock();
        // Re-read under the lock: another caller may have transitioned first
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner.opened_at.map(|t| t.elapsed());
                match elapsed {
                    Some(elapsed) if elapsed >= self.config.cooldown => {
                        inner.probe_in_flight = true;
                        self.state.store(CircuitState::HalfOpen as u8, Ordering::Release);
                        info!(component = %self.name, "🟡 Circuit breaker half-open (probing recovery)");
                        true
                    }
                    Some(_) => false,
                    None => {
                        // Open without a timestamp should not happen; admit
                        // the call rather than wedging the upstream shut
                        warn!(component = %self.name, "Circuit open but no timestamp recorded");
                        true
                    }
                }
            }
            CircuitState::HalfOpen => {
                if inner.probe_in_flight {
                    false
                } else {
                    inner.probe_in_flight = true;
                    true
                }
            }
        }
    }

    /// Record that the upstream answered (including with a domain outcome the
    /// caller classifies as non-failure).
    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        match self.state() {
            CircuitState::Closed => {
                inner.consecutive_failures = 0;
            }
            CircuitState::HalfOpen => {
                inner.consecutive_failures = 0;
                inner.opened_at = None;
                inner.probe_in_flight = false;
                self.state.store(CircuitState::Closed as u8, Ordering::Release);
                info!(component = %self.name, "🟢 Circuit breaker closed (recovered)");
            }
            CircuitState::Open => {
                // A call admitted just before the breaker opened finished
                // late; its success does not reopen the gate early
                debug!(component = %self.name, "Success recorded while circuit is open");
            }
        }
    }

    /// Record a classified upstream failure.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        match self.state() {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.opened_at = Some(Instant::now());
                    inner.probe_in_flight = false;
                    self.state.store(CircuitState::Open as u8, Ordering::Release);
                    warn!(
                        component = %self.name,
                        consecutive_failures = inner.consecutive_failures,
                        failure_threshold = self.config.failure_threshold,
                        cooldown_ms = self.config.cooldown.as_millis() as u64,
                        "🔴 Circuit breaker opened (failing fast)"
                    );
                }
            }
            CircuitState::HalfOpen => {
                // Probe failed: reopen and restart the cool-down
                inner.opened_at = Some(Instant::now());
                inner.probe_in_flight = false;
                self.state.store(CircuitState::Open as u8, Ordering::Release);
                warn!(component = %self.name, "🔴 Circuit breaker re-opened (probe failed)");
            }
            CircuitState::Open => {
                // Late failure from a call admitted before opening
            }
        }
    }

    /// Get component name
    pub fn name(&self) -> &str {
        &self.name
    }
}
