//! Display projection of stored weather records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocationLabel, WeatherRecord, icon_url, kelvin_to_fahrenheit};

/// Flattened, unit-converted view of a weather record.
///
/// This is also the shape stored in the shared cache, so field names are
/// part of the cache format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayWeather {
    pub coordinate_key: String,
    pub name: Option<String>,
    pub location: String,
    pub description: Option<String>,
    /// Degrees Fahrenheit.
    pub temp: Option<i32>,
    pub feels_like: Option<i32>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub wind: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Empty when the icon code is unknown.
    pub icon_image_url: String,
    pub updated_at: DateTime<Utc>,
}

impl DisplayWeather {
    /// Replace the record-level label with a user's own label.
    pub fn with_location(mut self, label: &LocationLabel) -> Self {
        self.location = label.as_str().to_owned();
        self
    }
}

/// Project a stored record into its display form.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use weatherboard::domain::{
///     CoordinateKey, GeoPoint, MainReadings, WeatherPayload, WeatherRecord, to_display_record,
/// };
///
/// let record = WeatherRecord {
///     coordinate_key: CoordinateKey::from_point(GeoPoint::new(51.5, -0.12).expect("point")),
///     payload: WeatherPayload {
///         main: Some(MainReadings { temp: Some(273.15), ..MainReadings::default() }),
///         ..WeatherPayload::default()
///     },
///     location: "London".to_owned(),
///     show_on_home_page: true,
///     updated_at: Utc::now(),
/// };
/// let display = to_display_record(&record);
/// assert_eq!(display.temp, Some(32));
/// assert_eq!(display.icon_image_url, "");
/// ```
pub fn to_display_record(record: &WeatherRecord) -> DisplayWeather {
    let payload = &record.payload;
    let condition = payload.primary_condition();
    let main = payload.main.as_ref();

    DisplayWeather {
        coordinate_key: record.coordinate_key.as_str().to_owned(),
        name: payload.name.clone(),
        location: record.location.clone(),
        description: condition.and_then(|c| c.description.clone()),
        temp: kelvin_to_fahrenheit(main.and_then(|m| m.temp)),
        feels_like: kelvin_to_fahrenheit(main.and_then(|m| m.feels_like)),
        temp_min: kelvin_to_fahrenheit(main.and_then(|m| m.temp_min)),
        temp_max: kelvin_to_fahrenheit(main.and_then(|m| m.temp_max)),
        pressure: main.and_then(|m| m.pressure),
        humidity: main.and_then(|m| m.humidity),
        wind: payload.wind.as_ref().and_then(|w| w.speed),
        lat: payload.coord.map(|c| c.lat),
        lon: payload.coord.map(|c| c.lon),
        icon_image_url: icon_url(condition.and_then(|c| c.icon.as_deref())).to_owned(),
        updated_at: record.updated_at,
    }
}
