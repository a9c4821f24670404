//! Domain types, services and ports.
//!
//! Everything in here is transport and storage agnostic. Inbound adapters
//! call the driving ports in [`ports`]; outbound adapters implement the
//! driven ones.

pub mod cache_fetch;
pub mod coordinates;
pub mod display;
pub mod error;
pub mod icons;
pub mod ports;
pub mod rate_limit;
pub mod trace_id;
pub mod units;
pub mod user;
pub mod weather;
pub mod weather_service;

pub use self::cache_fetch::{CacheFetcher, Cached};
pub use self::coordinates::{CoordinateError, CoordinateKey, GeoPoint};
pub use self::display::{DisplayWeather, to_display_record};
pub use self::error::{Error, ErrorCode};
pub use self::icons::icon_url;
pub use self::rate_limit::{
    FixedWindowPolicy, FixedWindowPolicyError, RateLimitDecision, RateLimitKey,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::units::kelvin_to_fahrenheit;
pub use self::user::{Caller, USER_ID_MAX, UserId, UserIdValidationError};
pub use self::weather::{
    LOCATION_LABEL_MAX, LocationLabel, LocationLabelValidationError, MainReadings,
    PayloadCoordinates, WEATHER_PAYLOAD_VERSION, WeatherCondition, WeatherPayload,
    WeatherRecord, UserLocation, WindReadings,
};
pub use self::weather_service::{
    ADDRESS_LOOKUP_SCOPE, WeatherService, WeatherServiceConfig, WeatherServicePorts,
};
