//! Redis-backed fixed-window limiter.
//!
//! Each window gets its own counter key, `ratelimit:<key>:<window index>`.
//! `INCR` and `EXPIRE` run in one `MULTI` block so concurrent callers across
//! processes observe a single count and stale counters age out on their own.

use std::sync::Arc;

use async_trait::async_trait;
use bb8_redis::redis;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{RateLimiter, RateLimiterError};
use crate::domain::{FixedWindowPolicy, RateLimitDecision, RateLimitKey};
use crate::outbound::redis::RedisPool;

/// Fixed-window limiter sharing counters through Redis.
pub struct RedisRateLimiter {
    pool: RedisPool,
    policy: FixedWindowPolicy,
    clock: Arc<dyn Clock>,
}

impl RedisRateLimiter {
    pub fn new(pool: RedisPool, policy: FixedWindowPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            policy,
            clock,
        }
    }
}

fn counter_key(key: &RateLimitKey, window: i64) -> String {
    format!("ratelimit:{key}:{window}")
}

fn backend_error(error: impl std::fmt::Display) -> RateLimiterError {
    debug!(%error, "redis rate limiter operation failed");
    RateLimiterError::backend(error.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitDecision, RateLimiterError> {
        let window = self.policy.window_index(self.clock.utc());
        let counter = counter_key(key, window);
        let ttl = i64::try_from(self.policy.window().as_secs()).unwrap_or(i64::MAX);

        let mut conn = self.pool.get().await.map_err(backend_error)?;
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .incr(&counter, 1)
            .expire(&counter, ttl)
            .ignore()
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        Ok(self.policy.decide(count, window))
    }
}
