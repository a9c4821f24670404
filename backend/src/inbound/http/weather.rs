//! Weather dashboard HTTP handlers.
//!
//! ```text
//! GET    /api/v1/weather/home
//! GET    /api/v1/weather/me
//! POST   /api/v1/weather/me/locations
//! DELETE /api/v1/weather/me/locations/{coordinateKey}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AddLocationRequest, WeatherSet, WeatherSource};
use crate::domain::{CoordinateKey, DisplayWeather, Error, LocationLabel};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::schemas::{DisplayWeatherSchema, ErrorSchema, WeatherSourceSchema};
use crate::inbound::http::state::HttpState;

const PRIVATE_CACHE_CONTROL: &str = "private, no-cache";

/// Weather list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeatherSetResponse {
    #[schema(value_type = Vec<DisplayWeatherSchema>)]
    pub weather: Vec<DisplayWeather>,
    /// `cache` when served from a live cache entry, else `computed`.
    #[schema(value_type = WeatherSourceSchema)]
    pub source: WeatherSource,
}

impl From<WeatherSet> for WeatherSetResponse {
    fn from(value: WeatherSet) -> Self {
        Self {
            weather: value.weather,
            source: value.source,
        }
    }
}

/// Request payload for adding a location by address.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddLocationPayload {
    /// The caller's label for the location.
    #[schema(example = "Office")]
    pub location: Option<String>,
    /// Free-form street address to geocode.
    #[schema(example = "350 5th Ave, New York, NY")]
    pub address: Option<String>,
}

fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

fn parse_label(raw: &str) -> Result<LocationLabel, Error> {
    LocationLabel::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "location", "code": "invalid_location" }))
    })
}

fn parse_coordinate_key(raw: &str) -> Result<CoordinateKey, Error> {
    CoordinateKey::parse(raw).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "coordinateKey", "code": "invalid_coordinate_key" }))
    })
}

fn weather_response(set: WeatherSet) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Cache-Control", PRIVATE_CACHE_CONTROL))
        .json(WeatherSetResponse::from(set))
}

/// Home-page weather, visible to everyone.
#[utoipa::path(
    get,
    path = "/api/v1/weather/home",
    responses(
        (status = 200, description = "Home-page weather", body = WeatherSetResponse),
        (status = 429, description = "Rate limited", body = ErrorSchema,
            headers(("Retry-After" = u64, description = "Seconds until the window resets"))),
        (status = 503, description = "Store or limiter unavailable", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "getHomeWeather"
)]
#[get("/weather/home")]
pub async fn get_home_weather(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    let set = state.weather.home_page(identity.caller()).await?;
    Ok(weather_response(set))
}

/// The caller's own locations.
#[utoipa::path(
    get,
    path = "/api/v1/weather/me",
    params(("X-Authenticated-User" = String, Header, description = "Caller identity")),
    responses(
        (status = 200, description = "The caller's weather", body = WeatherSetResponse),
        (status = 401, description = "Anonymous caller", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 503, description = "Store or limiter unavailable", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "getMyWeather"
)]
#[get("/weather/me")]
pub async fn get_my_weather(
    state: web::Data<HttpState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    let user_id = identity.require_user()?;
    let set = state.weather.user_page(&user_id).await?;
    Ok(weather_response(set))
}

/// Geocode an address and attach it to the caller under a label.
#[utoipa::path(
    post,
    path = "/api/v1/weather/me/locations",
    params(("X-Authenticated-User" = String, Header, description = "Caller identity")),
    request_body = AddLocationPayload,
    responses(
        (status = 200, description = "Refreshed weather for the caller", body = WeatherSetResponse),
        (status = 400, description = "Invalid label or unresolvable address", body = ErrorSchema),
        (status = 401, description = "Anonymous caller", body = ErrorSchema),
        (status = 409, description = "Label held by another user", body = ErrorSchema),
        (status = 429, description = "Rate limited", body = ErrorSchema),
        (status = 502, description = "Geocoder or weather provider failed", body = ErrorSchema),
        (status = 503, description = "Store or limiter unavailable", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "addMyLocation"
)]
#[post("/weather/me/locations")]
pub async fn add_location(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<AddLocationPayload>,
) -> ApiResult<HttpResponse> {
    let user_id = identity.require_user()?;
    let payload = payload.into_inner();
    let location = payload
        .location
        .ok_or_else(|| missing_field_error("location"))?;
    let address = payload
        .address
        .ok_or_else(|| missing_field_error("address"))?;

    let request = AddLocationRequest {
        user_id,
        location: parse_label(&location)?,
        address,
    };
    let set = state.locations.add_location_by_address(request).await?;
    Ok(weather_response(set))
}

/// Detach a location from the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/weather/me/locations/{coordinateKey}",
    params(
        ("coordinateKey" = String, Path, description = "Normalised `lat,lon` key"),
        ("X-Authenticated-User" = String, Header, description = "Caller identity")
    ),
    responses(
        (status = 200, description = "Refreshed weather for the caller", body = WeatherSetResponse),
        (status = 400, description = "Malformed coordinate key", body = ErrorSchema),
        (status = 401, description = "Anonymous caller", body = ErrorSchema),
        (status = 404, description = "Location not attached to the caller", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["weather"],
    operation_id = "removeMyLocation"
)]
#[delete("/weather/me/locations/{coordinateKey}")]
pub async fn remove_location(
    state: web::Data<HttpState>,
    identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = identity.require_user()?;
    let key = parse_coordinate_key(&path.into_inner())?;
    let set = state.locations.remove_location(&user_id, &key).await?;
    Ok(weather_response(set))
}

#[cfg(test)]
#[path = "weather_tests.rs"]
mod tests;
