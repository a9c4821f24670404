//! Cache-or-fetch over the shared cache.
//!
//! The cache is an accelerator, never a source of truth: read failures and
//! undecodable entries behave as misses, and write failures are logged and
//! dropped so a sick cache only costs latency.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Error;
use super::ports::{CacheKey, SharedCache, WeatherSource};

/// Items plus where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub items: Vec<T>,
    pub source: WeatherSource,
}

/// Reads JSON-encoded lists from the shared cache, computing and storing
/// them on a miss.
#[derive(Clone)]
pub struct CacheFetcher {
    cache: Arc<dyn SharedCache>,
    ttl: Duration,
}

impl CacheFetcher {
    /// Wrap `cache`; every entry this fetcher writes expires after `ttl`.
    pub fn new(cache: Arc<dyn SharedCache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Return the cached list under `key`, or run `compute`, store its result
    /// and return it. A failed computation is propagated and nothing is
    /// stored.
    pub async fn fetch<T, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<Cached<T>, Error>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, Error>>,
    {
        if let Some(items) = self.read(key).await {
            debug!(cache_key = %key, "cache hit");
            return Ok(Cached {
                items,
                source: WeatherSource::Cache,
            });
        }

        debug!(cache_key = %key, "cache miss");
        let items = compute().await?;
        self.store(key, &items).await;
        Ok(Cached {
            items,
            source: WeatherSource::Computed,
        })
    }

    /// Overwrite `key` with `items`. Failures are logged and swallowed.
    pub async fn store<T>(&self, key: &CacheKey, items: &[T])
    where
        T: Serialize + Sync,
    {
        let encoded = match serde_json::to_string(items) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(cache_key = %key, %error, "failed to encode cache entry");
                return;
            }
        };
        if let Err(error) = self.cache.set_with_expiry(key, encoded, self.ttl).await {
            warn!(cache_key = %key, %error, "failed to write cache entry");
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<Vec<T>> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(error) => {
                    warn!(cache_key = %key, %error, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(cache_key = %key, %error, "cache read failed; treating as miss");
                None
            }
        }
    }
}
