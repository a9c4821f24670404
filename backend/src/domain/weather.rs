//! Stored weather observations and user location associations.
//!
//! The provider payload is kept close to its wire shape with every field
//! optional: observations routinely omit blocks (no `wind` at sea, no
//! `weather` description for some stations) and the display layer treats a
//! missing field as "unknown" rather than failing the whole record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CoordinateKey, GeoPoint, UserId};

/// Schema version written next to every stored payload.
pub const WEATHER_PAYLOAD_VERSION: i16 = 1;

/// Maximum accepted length of a location label.
pub const LOCATION_LABEL_MAX: usize = 100;

/// Provider-reported coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadCoordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// One weather condition entry; the first one is the primary condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Provider condition id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Short condition group, e.g. `"Rain"`.
    #[serde(default)]
    pub main: Option<String>,
    /// Human readable description, e.g. `"light rain"`.
    #[serde(default)]
    pub description: Option<String>,
    /// Icon code, e.g. `"10d"`.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Temperature (Kelvin), pressure and humidity readings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    /// Atmospheric pressure in hPa.
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// Wind readings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindReadings {
    /// Wind speed as reported by the provider.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Wind direction in degrees.
    #[serde(default)]
    pub deg: Option<f64>,
}

/// Provider weather observation as stored alongside a record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherPayload {
    #[serde(default)]
    pub coord: Option<PayloadCoordinates>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub wind: Option<WindReadings>,
    /// Provider's own name for the station or city.
    #[serde(default)]
    pub name: Option<String>,
    /// Observation time as a Unix timestamp.
    #[serde(default)]
    pub dt: Option<i64>,
}

impl WeatherPayload {
    /// The provider's primary condition, if any.
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    /// The provider-reported point, if present and valid.
    pub fn point(&self) -> Option<GeoPoint> {
        let coord = self.coord?;
        GeoPoint::new(coord.lat, coord.lon).ok()
    }
}

/// Validation errors for [`LocationLabel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationLabelValidationError {
    #[error("location label must not be empty")]
    Empty,
    #[error("location label must be at most {max} characters")]
    TooLong { max: usize },
}

/// Human-readable location name chosen by a user, e.g. `"New York"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationLabel(String);

impl LocationLabel {
    /// Trim and validate a label.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LocationLabelValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LocationLabelValidationError::Empty);
        }
        if trimmed.chars().count() > LOCATION_LABEL_MAX {
            return Err(LocationLabelValidationError::TooLong {
                max: LOCATION_LABEL_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for LocationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for LocationLabel {
    type Error = LocationLabelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationLabel> for String {
    fn from(value: LocationLabel) -> Self {
        value.0
    }
}

/// A stored weather observation, unique per coordinate key.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub coordinate_key: CoordinateKey,
    pub payload: WeatherPayload,
    /// Label the record was created under.
    pub location: String,
    pub show_on_home_page: bool,
    pub updated_at: DateTime<Utc>,
}

/// Association between a user and a weather record.
#[derive(Debug, Clone, PartialEq)]
pub struct UserLocation {
    pub user_id: UserId,
    pub coordinate_key: CoordinateKey,
    pub location: LocationLabel,
    pub show_on_home_page: bool,
}
