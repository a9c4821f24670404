//! Process configuration loaded via OrthoConfig.
//!
//! Every field is optional at load time so CLI flags, `WEATHERBOARD_*`
//! environment variables and config files can be layered freely. Accessors
//! apply defaults and validate; startup fails on the first bad value.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{FixedWindowPolicy, WeatherServiceConfig};
use crate::outbound::geocoding::DEFAULT_GOOGLE_GEOCODING_URL;
use crate::outbound::openweathermap::DEFAULT_OPEN_WEATHER_MAP_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 50;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 3600;
const DEFAULT_LOOKUP_RATE_LIMIT_REQUESTS: u32 = 5;
const DEFAULT_LOOKUP_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_PAGE_LIMIT: usize = 100;

/// Configuration errors raised while validating settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A setting without a default was not supplied.
    #[error("missing required setting `{field}`")]
    Missing { field: &'static str },
    /// A count or duration was zero.
    #[error("setting `{field}` must be greater than zero")]
    Zero { field: &'static str },
    /// A value failed to parse.
    #[error("setting `{field}` is invalid: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WEATHERBOARD")]
pub struct WeatherboardSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Redis URL. When absent, cache and limiters are process-local.
    pub redis_url: Option<String>,
    /// OpenWeatherMap API key.
    pub open_weather_map_key: Option<String>,
    /// Google Geocoding API key.
    pub google_geocoding_key: Option<String>,
    /// Override for the OpenWeatherMap current-weather endpoint.
    pub open_weather_map_url: Option<String>,
    /// Override for the Google Geocoding endpoint.
    pub google_geocoding_url: Option<String>,
    /// Per-request timeout for upstream calls, in seconds.
    pub upstream_timeout_secs: Option<u64>,
    /// Shared cache TTL for weather lists, in seconds.
    pub cache_ttl_secs: Option<u64>,
    /// Requests allowed per caller per window.
    pub rate_limit_requests: Option<u32>,
    pub rate_limit_window_secs: Option<u64>,
    /// Address lookups allowed per user per window.
    pub lookup_rate_limit_requests: Option<u32>,
    pub lookup_rate_limit_window_secs: Option<u64>,
    /// Maximum records on the home page.
    pub home_page_limit: Option<usize>,
    /// Maximum locations on a user page.
    pub user_page_limit: Option<usize>,
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, SettingsError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SettingsError::Missing { field }),
    }
}

fn positive<T>(value: Option<T>, default: T, field: &'static str) -> Result<T, SettingsError>
where
    T: Default + PartialEq,
{
    let value = value.unwrap_or(default);
    if value == T::default() {
        Err(SettingsError::Zero { field })
    } else {
        Ok(value)
    }
}

fn parse_url(
    value: Option<&str>,
    default: &str,
    field: &'static str,
) -> Result<Url, SettingsError> {
    Url::parse(value.unwrap_or(default)).map_err(|err| SettingsError::Invalid {
        field,
        message: err.to_string(),
    })
}

fn policy(
    requests: Option<u32>,
    window_secs: Option<u64>,
    defaults: (u32, u64),
    fields: (&'static str, &'static str),
) -> Result<FixedWindowPolicy, SettingsError> {
    let requests = positive(requests, defaults.0, fields.0)?;
    let window = positive(window_secs, defaults.1, fields.1)?;
    FixedWindowPolicy::new(requests, Duration::from_secs(window)).map_err(|err| {
        SettingsError::Invalid {
            field: fields.0,
            message: err.to_string(),
        }
    })
}

impl WeatherboardSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
                field: "bind_addr",
                message: err.to_string(),
            })
    }

    /// PostgreSQL connection string. Required.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "database_url")
    }

    /// `None` selects the in-process cache and limiters.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Required.
    pub fn open_weather_map_key(&self) -> Result<&str, SettingsError> {
        required(self.open_weather_map_key.as_deref(), "open_weather_map_key")
    }

    /// Required.
    pub fn google_geocoding_key(&self) -> Result<&str, SettingsError> {
        required(self.google_geocoding_key.as_deref(), "google_geocoding_key")
    }

    /// Current-weather endpoint; overridable for tests and proxies.
    pub fn open_weather_map_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.open_weather_map_url.as_deref(),
            DEFAULT_OPEN_WEATHER_MAP_URL,
            "open_weather_map_url",
        )
    }

    /// Geocoding endpoint; overridable like the weather endpoint.
    pub fn google_geocoding_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.google_geocoding_url.as_deref(),
            DEFAULT_GOOGLE_GEOCODING_URL,
            "google_geocoding_url",
        )
    }

    /// Per-request timeout for both upstream clients.
    pub fn upstream_timeout(&self) -> Result<Duration, SettingsError> {
        positive(
            self.upstream_timeout_secs,
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
            "upstream_timeout_secs",
        )
        .map(Duration::from_secs)
    }

    /// Policy for the per-caller request limiter.
    pub fn request_policy(&self) -> Result<FixedWindowPolicy, SettingsError> {
        policy(
            self.rate_limit_requests,
            self.rate_limit_window_secs,
            (DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS),
            ("rate_limit_requests", "rate_limit_window_secs"),
        )
    }

    /// Policy for the per-user address lookup limiter.
    pub fn lookup_policy(&self) -> Result<FixedWindowPolicy, SettingsError> {
        policy(
            self.lookup_rate_limit_requests,
            self.lookup_rate_limit_window_secs,
            (
                DEFAULT_LOOKUP_RATE_LIMIT_REQUESTS,
                DEFAULT_LOOKUP_RATE_LIMIT_WINDOW_SECS,
            ),
            ("lookup_rate_limit_requests", "lookup_rate_limit_window_secs"),
        )
    }

    /// Cache expiry and page caps for the weather service.
    pub fn service_config(&self) -> Result<WeatherServiceConfig, SettingsError> {
        Ok(WeatherServiceConfig {
            cache_ttl: Duration::from_secs(positive(
                self.cache_ttl_secs,
                DEFAULT_CACHE_TTL_SECS,
                "cache_ttl_secs",
            )?),
            home_page_limit: positive(self.home_page_limit, DEFAULT_PAGE_LIMIT, "home_page_limit")?,
            user_page_limit: positive(self.user_page_limit, DEFAULT_PAGE_LIMIT, "user_page_limit")?,
        })
    }
}
