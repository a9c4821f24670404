//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their structure so utoipa can document them from the
//! inbound adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The operation needs an authenticated caller.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The location label belongs to another user.
    #[schema(rename = "conflict")]
    Conflict,
    /// The caller exhausted its rate limit.
    #[schema(rename = "too_many_requests")]
    TooManyRequests,
    /// The geocoder or weather provider failed.
    #[schema(rename = "upstream_unavailable")]
    UpstreamUnavailable,
    /// The store, cache or limiter is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "address could not be resolved")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, e.g. `retryAfterSeconds` on 429.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::DisplayWeather`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DisplayWeather)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DisplayWeatherSchema {
    /// Normalised `"lat,lon"` key identifying the location.
    #[schema(example = "40.7,-74")]
    coordinate_key: String,
    /// Provider's name for the nearest station or city.
    #[schema(example = "New York")]
    name: Option<String>,
    /// Location label; the caller's own label on the user page.
    #[schema(example = "Office")]
    location: String,
    #[schema(example = "clear sky")]
    description: Option<String>,
    /// Temperature in whole degrees Fahrenheit.
    #[schema(example = 68)]
    temp: Option<i32>,
    feels_like: Option<i32>,
    temp_min: Option<i32>,
    temp_max: Option<i32>,
    /// Pressure in hPa.
    pressure: Option<f64>,
    /// Relative humidity in percent.
    humidity: Option<f64>,
    /// Wind speed.
    wind: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Icon image URL; empty when the condition icon is unknown.
    #[schema(example = "https://openweathermap.org/img/wn/01d@2x.png")]
    icon_image_url: String,
    /// When the stored observation was last refreshed.
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::WeatherSource`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::WeatherSource)]
pub enum WeatherSourceSchema {
    /// Served from a live cache entry.
    #[schema(rename = "cache")]
    Cache,
    /// Recomputed from the store.
    #[schema(rename = "computed")]
    Computed,
}
