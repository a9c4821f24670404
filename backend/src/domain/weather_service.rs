//! Weather dashboard orchestration.
//!
//! Implements the [`WeatherQuery`] and [`WeatherCommand`] driving ports:
//! every call is rate limited first, reads go through the shared cache, and
//! mutations rewrite the caller's cached list from the store once they have
//! committed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AddLocationRequest, AttachOutcome, CacheKey, DetachOutcome, Geocoder, GeocoderError,
    RateLimiter, RateLimiterError, SharedCache, UserLocationRepository,
    UserLocationRepositoryError, UserPersistenceError, UserRepository, WeatherCommand,
    WeatherProvider, WeatherProviderError, WeatherQuery, WeatherRecordRepository,
    WeatherRecordRepositoryError, WeatherSet, WeatherSource,
};
use crate::domain::{
    CacheFetcher, Caller, CoordinateKey, DisplayWeather, Error, LocationLabel, RateLimitKey,
    UserId, UserLocation, WeatherRecord, to_display_record,
};

/// Rate-limit scope for the geocode-and-fetch mutation.
pub const ADDRESS_LOOKUP_SCOPE: &str = "address-lookup";

/// Collaborators required by [`WeatherService`].
#[derive(Clone)]
pub struct WeatherServicePorts {
    /// Read side of stored weather.
    pub records: Arc<dyn WeatherRecordRepository>,
    /// Associations and the attach/detach lifecycle.
    pub locations: Arc<dyn UserLocationRepository>,
    /// Lazily provisioned user rows.
    pub users: Arc<dyn UserRepository>,
    /// Shared cache for computed pages.
    pub cache: Arc<dyn SharedCache>,
    /// Coarse per-caller budget applied to every operation.
    pub request_limiter: Arc<dyn RateLimiter>,
    /// Tighter budget for address lookups, which hit paid upstream APIs.
    pub lookup_limiter: Arc<dyn RateLimiter>,
    /// Resolves free-form addresses.
    pub geocoder: Arc<dyn Geocoder>,
    /// Fetches current weather for a point.
    pub provider: Arc<dyn WeatherProvider>,
    /// Stamps `updated_at` on new records.
    pub clock: Arc<dyn Clock>,
}

/// Tunables for [`WeatherService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherServiceConfig {
    /// Expiry of cached home and user pages.
    pub cache_ttl: Duration,
    /// Most records listed on the home page.
    pub home_page_limit: usize,
    /// Most locations listed on one user's page.
    pub user_page_limit: usize,
}

impl Default for WeatherServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            home_page_limit: 100,
            user_page_limit: 100,
        }
    }
}

/// Weather service implementing the driving ports.
#[derive(Clone)]
pub struct WeatherService {
    records: Arc<dyn WeatherRecordRepository>,
    locations: Arc<dyn UserLocationRepository>,
    users: Arc<dyn UserRepository>,
    request_limiter: Arc<dyn RateLimiter>,
    lookup_limiter: Arc<dyn RateLimiter>,
    geocoder: Arc<dyn Geocoder>,
    provider: Arc<dyn WeatherProvider>,
    clock: Arc<dyn Clock>,
    fetcher: CacheFetcher,
    config: WeatherServiceConfig,
}

impl WeatherService {
    /// Create a new service.
    ///
    /// # Errors
    /// Returns `invalid_request` when a page limit is zero or the cache TTL
    /// is shorter than one second.
    pub fn new(ports: WeatherServicePorts, config: WeatherServiceConfig) -> Result<Self, Error> {
        if config.home_page_limit == 0 || config.user_page_limit == 0 {
            return Err(Error::invalid_request("page limits must be positive"));
        }
        if config.cache_ttl.as_secs() == 0 {
            return Err(Error::invalid_request(
                "cache ttl must be at least one second",
            ));
        }
        Ok(Self {
            records: ports.records,
            locations: ports.locations,
            users: ports.users,
            request_limiter: ports.request_limiter,
            lookup_limiter: ports.lookup_limiter,
            geocoder: ports.geocoder,
            provider: ports.provider,
            clock: ports.clock,
            fetcher: CacheFetcher::new(ports.cache, config.cache_ttl),
            config,
        })
    }

    async fn enforce(&self, limiter: &dyn RateLimiter, key: &RateLimitKey) -> Result<(), Error> {
        let decision = limiter.check(key).await.map_err(map_rate_limiter_error)?;
        if decision.allowed {
            return Ok(());
        }
        let retry_after = decision.retry_after_secs(self.clock.utc());
        info!(rate_limit_key = %key, retry_after, "rate limit exceeded");
        Err(
            Error::too_many_requests("rate limit exceeded; try again later").with_details(json!({
                "limit": decision.limit,
                "retryAfterSeconds": retry_after,
                "resetsAt": decision.resets_at.to_rfc3339(),
            })),
        )
    }

    async fn load_home_page(&self) -> Result<Vec<DisplayWeather>, Error> {
        let records = self
            .records
            .list_home_page(self.config.home_page_limit)
            .await
            .map_err(map_record_error)?;
        Ok(records.iter().map(to_display_record).collect())
    }

    async fn load_user_page(&self, user_id: &UserId) -> Result<Vec<DisplayWeather>, Error> {
        let locations = self
            .locations
            .list_for_user(user_id, self.config.user_page_limit)
            .await
            .map_err(map_location_error)?;
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<CoordinateKey> = locations
            .iter()
            .map(|location| location.coordinate_key.clone())
            .collect();
        let records: HashMap<CoordinateKey, WeatherRecord> = self
            .records
            .find_by_keys(&keys)
            .await
            .map_err(map_record_error)?
            .into_iter()
            .map(|record| (record.coordinate_key.clone(), record))
            .collect();

        let mut weather = Vec::with_capacity(locations.len());
        for location in &locations {
            match records.get(&location.coordinate_key) {
                Some(record) => {
                    weather.push(to_display_record(record).with_location(&location.location));
                }
                None => warn!(
                    %user_id,
                    coordinate_key = %location.coordinate_key,
                    "association references a missing weather record"
                ),
            }
        }
        Ok(weather)
    }

    async fn refresh_user_page(&self, user_id: &UserId) -> Result<WeatherSet, Error> {
        let weather = self.load_user_page(user_id).await?;
        self.fetcher
            .store(&CacheKey::user_page(user_id), &weather)
            .await;
        Ok(WeatherSet {
            weather,
            source: WeatherSource::Computed,
        })
    }

    async fn ensure_label_available(
        &self,
        user_id: &UserId,
        label: &LocationLabel,
    ) -> Result<(), Error> {
        let holders = self
            .locations
            .find_by_label(label)
            .await
            .map_err(map_location_error)?;
        let claimed = holders
            .iter()
            .any(|holder| &holder.user_id != user_id && !holder.show_on_home_page);
        if claimed {
            return Err(
                Error::conflict(format!("location \"{label}\" is already taken"))
                    .with_details(json!({ "field": "location", "code": "duplicate_location" })),
            );
        }
        Ok(())
    }

    async fn ensure_user(&self, user_id: &UserId) -> Result<(), Error> {
        let created = self
            .users
            .ensure_exists(user_id)
            .await
            .map_err(map_user_error)?;
        if created {
            info!(%user_id, "provisioned user on first mutation");
        }
        Ok(())
    }

    async fn resolve_record(
        &self,
        address: &str,
        label: &LocationLabel,
    ) -> Result<WeatherRecord, Error> {
        let point = self
            .geocoder
            .geocode(address)
            .await
            .map_err(map_geocoder_error)?
            .ok_or_else(|| {
                Error::invalid_request("address could not be resolved")
                    .with_details(json!({ "field": "address", "code": "unresolved_address" }))
            })?;

        let payload = self
            .provider
            .current_weather(point)
            .await
            .map_err(map_provider_error)?;
        // Key from the provider's coordinates; the geocoder's may round differently.
        let provider_point = payload.point().ok_or_else(|| {
            Error::upstream_unavailable("weather provider response is missing coordinates")
        })?;

        Ok(WeatherRecord {
            coordinate_key: CoordinateKey::from_point(provider_point),
            payload,
            location: label.as_str().to_owned(),
            show_on_home_page: false,
            updated_at: self.clock.utc(),
        })
    }
}

#[async_trait]
impl WeatherQuery for WeatherService {
    async fn home_page(&self, caller: &Caller) -> Result<WeatherSet, Error> {
        self.enforce(&*self.request_limiter, &RateLimitKey::for_caller(caller))
            .await?;
        let cached = self
            .fetcher
            .fetch(&CacheKey::home_page(), || self.load_home_page())
            .await?;
        Ok(WeatherSet {
            weather: cached.items,
            source: cached.source,
        })
    }

    async fn user_page(&self, user_id: &UserId) -> Result<WeatherSet, Error> {
        self.enforce(&*self.request_limiter, &RateLimitKey::for_user(user_id))
            .await?;
        let cached = self
            .fetcher
            .fetch(&CacheKey::user_page(user_id), || {
                self.load_user_page(user_id)
            })
            .await?;
        Ok(WeatherSet {
            weather: cached.items,
            source: cached.source,
        })
    }
}

#[async_trait]
impl WeatherCommand for WeatherService {
    async fn add_location_by_address(
        &self,
        request: AddLocationRequest,
    ) -> Result<WeatherSet, Error> {
        let AddLocationRequest {
            user_id,
            location,
            address,
        } = request;
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::invalid_request("address must not be empty")
                .with_details(json!({ "field": "address", "code": "empty_address" })));
        }

        let key = RateLimitKey::for_user(&user_id);
        self.enforce(&*self.request_limiter, &key).await?;
        self.enforce(&*self.lookup_limiter, &key.scoped(ADDRESS_LOOKUP_SCOPE))
            .await?;
        self.ensure_user(&user_id).await?;
        self.ensure_label_available(&user_id, &location).await?;

        let record = self.resolve_record(address, &location).await?;
        let association = UserLocation {
            user_id: user_id.clone(),
            coordinate_key: record.coordinate_key.clone(),
            location,
            show_on_home_page: false,
        };
        let AttachOutcome {
            record_created,
            association_created,
        } = self
            .locations
            .attach(&record, &association)
            .await
            .map_err(map_location_error)?;
        info!(
            %user_id,
            coordinate_key = %record.coordinate_key,
            record_created,
            association_created,
            "attached location"
        );

        self.refresh_user_page(&user_id).await
    }

    async fn remove_location(
        &self,
        user_id: &UserId,
        key: &CoordinateKey,
    ) -> Result<WeatherSet, Error> {
        self.enforce(&*self.request_limiter, &RateLimitKey::for_user(user_id))
            .await?;
        self.ensure_user(user_id).await?;

        match self
            .locations
            .detach(user_id, key)
            .await
            .map_err(map_location_error)?
        {
            DetachOutcome::NotFound => {
                return Err(Error::not_found(format!(
                    "no tracked location with key {key}"
                )));
            }
            DetachOutcome::Detached { record_deleted } => {
                info!(%user_id, coordinate_key = %key, record_deleted, "detached location");
            }
        }

        self.refresh_user_page(user_id).await
    }
}

fn map_rate_limiter_error(error: RateLimiterError) -> Error {
    warn!(%error, "rate limiter unavailable; rejecting request");
    match error {
        RateLimiterError::Backend { message } => {
            Error::service_unavailable(format!("rate limiter unavailable: {message}"))
        }
    }
}

fn map_record_error(error: WeatherRecordRepositoryError) -> Error {
    match error {
        WeatherRecordRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("weather store unavailable: {message}"))
        }
        WeatherRecordRepositoryError::Query { message } => {
            Error::internal(format!("weather store error: {message}"))
        }
        WeatherRecordRepositoryError::Decode { message } => {
            Error::internal(format!("stored weather is unreadable: {message}"))
        }
    }
}

fn map_location_error(error: UserLocationRepositoryError) -> Error {
    match error {
        UserLocationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("location store unavailable: {message}"))
        }
        UserLocationRepositoryError::Query { message } => {
            Error::internal(format!("location store error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn map_geocoder_error(error: GeocoderError) -> Error {
    warn!(%error, "geocoder call failed");
    Error::upstream_unavailable(error.to_string())
}

fn map_provider_error(error: WeatherProviderError) -> Error {
    warn!(%error, "weather provider call failed");
    Error::upstream_unavailable(error.to_string())
}

#[cfg(test)]
#[path = "weather_service_tests.rs"]
mod tests;
