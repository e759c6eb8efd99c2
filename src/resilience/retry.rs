//! # Retry Policy
//!
//! Bounded linear-backoff retry for idempotent read operations. Attempt `n`
//! waits `base_delay * n` before the next try. Which errors are retryable is
//! decided by [`crate::error::ClientError::is_retryable`]; the policy here
//! only owns the attempt budget and the backoff curve.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first call. 1 disables retries.
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the attempt that follows failed attempt `attempt`
    /// (1-indexed): linear in the attempt number.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}
