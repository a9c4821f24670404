//! Builders wiring outbound adapters into the weather service.

use std::sync::Arc;
use std::time::Duration;

use mockable::{Clock, DefaultClock};
use tracing::info;

use weatherboard::domain::ports::{RateLimiter, SharedCache};
use weatherboard::domain::{WeatherService, WeatherServicePorts};
use weatherboard::inbound::http::state::HttpState;
use weatherboard::outbound::cache::{InMemoryCache, RedisCache};
use weatherboard::outbound::geocoding::GoogleGeocoder;
use weatherboard::outbound::openweathermap::OpenWeatherMapProvider;
use weatherboard::outbound::persistence::{
    DbPool, DieselUserLocationRepository, DieselUserRepository, DieselWeatherRecordRepository,
};
use weatherboard::outbound::rate_limit::{InMemoryRateLimiter, RedisRateLimiter};
use weatherboard::outbound::redis::RedisPool;
use weatherboard::settings::WeatherboardSettings;

const REDIS_POOL_SIZE: u32 = 16;
const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type StartupResult<T> = Result<T, std::io::Error>;

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

/// Cache and limiters, shared through Redis or kept in process.
struct Coordination {
    cache: Arc<dyn SharedCache>,
    request_limiter: Arc<dyn RateLimiter>,
    lookup_limiter: Arc<dyn RateLimiter>,
}

async fn build_coordination(
    settings: &WeatherboardSettings,
    clock: &Arc<dyn Clock>,
) -> StartupResult<Coordination> {
    let request_policy = settings
        .request_policy()
        .map_err(|err| startup_error("invalid request rate limit", err))?;
    let lookup_policy = settings
        .lookup_policy()
        .map_err(|err| startup_error("invalid lookup rate limit", err))?;

    match settings.redis_url() {
        Some(url) => {
            let pool = RedisPool::new(url, REDIS_POOL_SIZE, REDIS_CONNECT_TIMEOUT)
                .await
                .map_err(|err| startup_error("redis pool", err))?;
            info!("using redis for the shared cache and rate limiters");
            Ok(Coordination {
                cache: Arc::new(RedisCache::new(pool.clone())),
                request_limiter: Arc::new(RedisRateLimiter::new(
                    pool.clone(),
                    request_policy,
                    Arc::clone(clock),
                )),
                lookup_limiter: Arc::new(RedisRateLimiter::new(
                    pool,
                    lookup_policy,
                    Arc::clone(clock),
                )),
            })
        }
        None => {
            info!("no redis url configured; cache and rate limiters are process-local");
            Ok(Coordination {
                cache: Arc::new(InMemoryCache::new(Arc::clone(clock))),
                request_limiter: Arc::new(InMemoryRateLimiter::new(
                    request_policy,
                    Arc::clone(clock),
                )),
                lookup_limiter: Arc::new(InMemoryRateLimiter::new(
                    lookup_policy,
                    Arc::clone(clock),
                )),
            })
        }
    }
}

/// Build the HTTP state backed by PostgreSQL, the upstream APIs and either
/// Redis or in-process coordination.
///
/// # Errors
/// Returns [`std::io::Error`] when a setting is invalid or an adapter cannot
/// be constructed.
pub async fn build_http_state(
    settings: &WeatherboardSettings,
    pool: DbPool,
) -> StartupResult<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let timeout = settings
        .upstream_timeout()
        .map_err(|err| startup_error("invalid upstream timeout", err))?;

    let geocoder = GoogleGeocoder::new(
        settings
            .google_geocoding_url()
            .map_err(|err| startup_error("invalid geocoding url", err))?,
        settings
            .google_geocoding_key()
            .map_err(|err| startup_error("geocoder", err))?,
        timeout,
    )
    .map_err(|err| startup_error("geocoder client", err))?;
    let provider = OpenWeatherMapProvider::new(
        settings
            .open_weather_map_url()
            .map_err(|err| startup_error("invalid weather provider url", err))?,
        settings
            .open_weather_map_key()
            .map_err(|err| startup_error("weather provider", err))?,
        timeout,
    )
    .map_err(|err| startup_error("weather provider client", err))?;

    let coordination = build_coordination(settings, &clock).await?;
    let config = settings
        .service_config()
        .map_err(|err| startup_error("invalid service config", err))?;

    let service = WeatherService::new(
        WeatherServicePorts {
            records: Arc::new(DieselWeatherRecordRepository::new(pool.clone())),
            locations: Arc::new(DieselUserLocationRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool)),
            cache: coordination.cache,
            request_limiter: coordination.request_limiter,
            lookup_limiter: coordination.lookup_limiter,
            geocoder: Arc::new(geocoder),
            provider: Arc::new(provider),
            clock,
        },
        config,
    )
    .map_err(|err| startup_error("weather service", err))?;

    let service = Arc::new(service);
    Ok(HttpState::new(service.clone(), service))
}
