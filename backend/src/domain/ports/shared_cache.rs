//! Port for the shared expiring string cache.
use std::time::Duration;

use async_trait::async_trait;

use super::{CacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum SharedCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "shared cache backend failure: {message}",
    }
}

/// Key/value cache with per-entry expiry, shared by every process.
///
/// Values are opaque strings; callers own the encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SharedCache: Send + Sync {
    /// Read a live entry. Expired entries read as `None`.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SharedCacheError>;

    /// Store `value` under `key`, replacing any prior value, expiring after `ttl`.
    async fn set_with_expiry(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), SharedCacheError>;
}
