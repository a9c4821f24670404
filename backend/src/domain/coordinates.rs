//! Geographic points and their canonical string key.
//!
//! Weather records are deduplicated by coordinate, so the key rendering has
//! to be stable: the same place must always produce the same string no matter
//! how many decimals the provider echoes back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for coordinates and coordinate keys.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// A component was NaN or infinite.
    #[error("coordinates must be finite numbers")]
    NotFinite,
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Offending latitude.
        value: f64,
    },
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Offending longitude.
        value: f64,
    },
    /// The key was not of the form `<lat>,<lon>`.
    #[error("coordinate key must look like `<lat>,<lon>`")]
    Malformed,
}

/// Validated WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange { value: latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange { value: longitude });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Canonical `"<lat>,<lon>"` identity of a weather record.
///
/// Components are rounded to four decimals, trailing zeros and a dangling
/// decimal point are dropped and negative zero renders as `0`.
///
/// # Examples
/// ```
/// use weatherboard::domain::{CoordinateKey, GeoPoint};
///
/// let point = GeoPoint::new(40.7000, -74.0000).expect("valid point");
/// assert_eq!(CoordinateKey::from_point(point).as_str(), "40.7,-74");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoordinateKey(String);

impl CoordinateKey {
    /// Render the canonical key for a point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self(format!(
            "{},{}",
            format_component(point.latitude()),
            format_component(point.longitude())
        ))
    }

    /// Parse a key supplied from outside, re-normalising it.
    ///
    /// `"40.70000,-74.0"` and `"40.7,-74"` parse to the same key.
    pub fn parse(raw: &str) -> Result<Self, CoordinateError> {
        let (lat, lon) = raw.split_once(',').ok_or(CoordinateError::Malformed)?;
        let lat = parse_component(lat)?;
        let lon = parse_component(lon)?;
        Ok(Self::from_point(GeoPoint::new(lat, lon)?))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn parse_component(raw: &str) -> Result<f64, CoordinateError> {
    if raw.is_empty() || raw.trim() != raw {
        return Err(CoordinateError::Malformed);
    }
    raw.parse::<f64>().map_err(|_| CoordinateError::Malformed)
}

fn format_component(value: f64) -> String {
    let mut text = format!("{value:.4}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_owned();
    }
    text
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CoordinateKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for CoordinateKey {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CoordinateKey {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CoordinateKey> for String {
    fn from(value: CoordinateKey) -> Self {
        value.0
    }
}
