//! Fixed-window rate limiter adapters.
//!
//! Both adapters count with an atomic increment per `(key, window)` pair and
//! let the domain [`FixedWindowPolicy`] turn the count into a decision.
//!
//! [`FixedWindowPolicy`]: crate::domain::FixedWindowPolicy

mod in_memory;
mod redis;

pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
