//! Process-local fixed-window limiter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{RateLimiter, RateLimiterError};
use crate::domain::{FixedWindowPolicy, RateLimitDecision, RateLimitKey};

/// Counters keyed by limiter key, each holding `(window index, count)`.
///
/// Counters from past windows are pruned whenever a new window is observed.
pub struct InMemoryRateLimiter {
    policy: FixedWindowPolicy,
    counters: Mutex<HashMap<String, (i64, u64)>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
    pub fn new(policy: FixedWindowPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            counters: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitDecision, RateLimiterError> {
        let window = self.policy.window_index(self.clock.utc());
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| RateLimiterError::backend("in-memory limiter lock poisoned"))?;

        let count = match counters.get_mut(key.as_str()) {
            Some((index, count)) if *index == window => {
                *count = count.saturating_add(1);
                *count
            }
            _ => {
                counters.retain(|_, (index, _)| *index >= window);
                counters.insert(key.as_str().to_owned(), (window, 1));
                1
            }
        };
        Ok(self.policy.decide(count, window))
    }
}
