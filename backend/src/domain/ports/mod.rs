//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (store, cache, limiter, upstream services) expose strongly
//! typed errors so the service can decide which failures are fatal. Driving
//! ports ([`WeatherQuery`], [`WeatherCommand`]) speak the domain [`Error`].
//!
//! [`Error`]: crate::domain::Error

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod geocoder;
mod rate_limiter;
mod shared_cache;
mod user_location_repository;
mod user_repository;
mod weather_provider;
mod weather_query;
mod weather_record_repository;

pub use cache_key::{CacheKey, CacheKeyValidationError};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{Geocoder, GeocoderError};
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
pub use rate_limiter::{RateLimiter, RateLimiterError};
#[cfg(test)]
pub use shared_cache::MockSharedCache;
pub use shared_cache::{SharedCache, SharedCacheError};
#[cfg(test)]
pub use user_location_repository::MockUserLocationRepository;
pub use user_location_repository::{
    AttachOutcome, DetachOutcome, UserLocationRepository, UserLocationRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use weather_provider::MockWeatherProvider;
pub use weather_provider::{WeatherProvider, WeatherProviderError};
#[cfg(test)]
pub use weather_query::{MockWeatherCommand, MockWeatherQuery};
pub use weather_query::{
    AddLocationRequest, WeatherCommand, WeatherQuery, WeatherSet, WeatherSource,
};
#[cfg(test)]
pub use weather_record_repository::MockWeatherRecordRepository;
pub use weather_record_repository::{WeatherRecordRepository, WeatherRecordRepositoryError};
