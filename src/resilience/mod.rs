//! # Resilience Module
//!
//! Uniform cross-cutting failure policy for upstream adapter calls,
//! independent of which concrete adapter is configured.
//!
//! ## Architecture
//!
//! - **Circuit Breakers**: Isolate a failing upstream by failing fast instead
//!   of piling more calls onto it
//! - **Retry**: Bounded linear-backoff retries for idempotent reads only
//! - **Timeout**: Every adapter call is bounded; a caller is never left
//!   hanging on a stuck transport
//!
//! ## Usage
//!
//! ```rust,no_run
//! use smithy_core::config::UpstreamConfig;
//! use smithy_core::resilience::Resilience;
//!
//! # async fn example() -> smithy_core::error::Result<()> {
//! let resilience = Resilience::from_config("forge", &UpstreamConfig::default());
//!
//! let value = resilience
//!     .read("get_sample", || async {
//!         // adapter call here
//!         Ok::<_, smithy_core::error::ClientError>("sample")
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod circuit_breaker;
pub mod retry;
pub mod wrapper;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::RetryPolicy;
pub use wrapper::Resilience;
