//! Port for fixed-window rate limiters.
use async_trait::async_trait;

use crate::domain::{RateLimitDecision, RateLimitKey};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by rate limiter adapters.
    pub enum RateLimiterError {
        /// Counter store is unavailable or timing out.
        Backend { message: String } => "rate limiter backend failure: {message}",
    }
}

/// Counts one request against `key` and decides whether it may proceed.
///
/// Implementations own their [`crate::domain::FixedWindowPolicy`]; the
/// increment and the decision must be atomic with respect to concurrent
/// callers sharing the same key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitDecision, RateLimiterError>;
}
