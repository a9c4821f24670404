//! Wire shapes for Google Geocoding responses.

use serde::Deserialize;

use crate::domain::GeoPoint;
use crate::domain::ports::GeocoderError;

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResponseDto {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResultDto>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeResultDto {
    pub geometry: GeometryDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    pub location: LatLngDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeResponseDto {
    /// Interpret the envelope. `ZERO_RESULTS` is a successful "no match".
    pub(super) fn into_domain_point(self) -> Result<Option<GeoPoint>, GeocoderError> {
        match self.status.as_str() {
            "OK" => {
                let Some(first) = self.results.into_iter().next() else {
                    return Err(GeocoderError::decode("status OK without results"));
                };
                let LatLngDto { lat, lng } = first.geometry.location;
                GeoPoint::new(lat, lng)
                    .map(Some)
                    .map_err(|err| GeocoderError::decode(err.to_string()))
            }
            "ZERO_RESULTS" => Ok(None),
            other => Err(GeocoderError::status(match self.error_message {
                Some(detail) => format!("{other}: {detail}"),
                None => other.to_owned(),
            })),
        }
    }
}
