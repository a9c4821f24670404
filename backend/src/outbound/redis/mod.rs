//! Shared Redis connection pool for the cache and rate limiter adapters.

use std::time::Duration;

use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};

/// Errors raised while building or using the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedisPoolError {
    #[error("failed to build redis pool: {message}")]
    Build { message: String },

    #[error("failed to get redis connection from pool: {message}")]
    Checkout { message: String },
}

impl RedisPoolError {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

/// Cloneable handle to a bb8-managed Redis pool.
#[derive(Clone)]
pub struct RedisPool {
    inner: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Build a pool for `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Build`] when the URL is invalid or the pool
    /// cannot be constructed.
    pub async fn new(
        redis_url: &str,
        max_size: u32,
        connection_timeout: Duration,
    ) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| RedisPoolError::build(err.to_string()))?;
        let inner = Pool::builder()
            .max_size(max_size)
            .connection_timeout(connection_timeout)
            .build(manager)
            .await
            .map_err(|err| RedisPoolError::build(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`RedisPoolError::Checkout`] when Redis is unreachable or the
    /// pool is exhausted past its timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, RedisPoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| RedisPoolError::checkout(err.to_string()))
    }
}
