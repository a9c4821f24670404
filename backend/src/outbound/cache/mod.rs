//! Shared cache adapters.
//!
//! [`RedisCache`] is the production backend. [`InMemoryCache`]
//! serves single-process deployments and tests; it honours expiry but is not
//! shared between processes.

mod in_memory;
mod redis;

pub use in_memory::InMemoryCache;
pub use redis::RedisCache;
