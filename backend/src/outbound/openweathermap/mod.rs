//! OpenWeatherMap outbound adapter.
//!
//! Implements the `WeatherProvider` port against the current-weather
//! endpoint (`/data/2.5/weather`).

mod http_provider;

pub use http_provider::{DEFAULT_OPEN_WEATHER_MAP_URL, OpenWeatherMapProvider};
