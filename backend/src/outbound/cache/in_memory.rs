//! Process-local `SharedCache` with clock-driven expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CacheKey, SharedCache, SharedCacheError};

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Mutex-guarded map of entries.
///
/// Expired entries are evicted when read, and every write sweeps the whole
/// map so keys that are never read again do not accumulate.
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, SharedCacheError> {
        self.entries
            .lock()
            .map_err(|_| SharedCacheError::backend("in-memory cache lock poisoned"))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }
}

#[async_trait]
impl SharedCache for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, SharedCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_expiry(
        &self,
        key: &CacheKey,
        value: String,
        ttl: Duration,
    ) -> Result<(), SharedCacheError> {
        let ttl = TimeDelta::from_std(ttl)
            .map_err(|err| SharedCacheError::backend(format!("invalid ttl: {err}")))?;
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.as_str().to_owned(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
