//! Redis-backed `SharedCache` using `GET` and `SET ... EX`.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{CacheKey, SharedCache, SharedCacheError};
use crate::outbound::redis::RedisPool;

/// Shared cache stored in Redis; expiry is delegated to the server.
#[derive(Clone)]
pub struct RedisCache {
    pool: RedisPool,
}

impl RedisCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

/// Redis rejects `EX 0`; round sub-second TTLs up to one second.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn backend_error(error: impl std::fmt::Display) -> SharedCacheError {
    debug!(%error, "redis cache operation failed");
    SharedCacheError::backend(error.to_string())
}

#[async_trait]
impl SharedCache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SharedCacheError> {
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        conn.get::<_, Option<String>>(key.as_str())
            .await
            .map_err(backend_error)
    }

    async fn set_with_expiry(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), SharedCacheError> {
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        conn.set_ex::<_, _, ()>(key.as_str(), value, expiry_secs(ttl))
            .await
            .map_err(backend_error)
    }
}
