//! Reqwest-backed Google Geocoding client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::dto::GeocodeResponseDto;
use crate::domain::GeoPoint;
use crate::domain::ports::{Geocoder, GeocoderError};
use crate::outbound::http_support::{UpstreamErrorKinds, map_status_error, map_transport_error};

/// Public geocoding endpoint.
pub const DEFAULT_GOOGLE_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const ERROR_KINDS: UpstreamErrorKinds<GeocoderError> = UpstreamErrorKinds {
    timeout: GeocoderError::timeout,
    transport: GeocoderError::transport,
    status: GeocoderError::status,
};

/// Geocoder that forwards free-form addresses to Google.
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleGeocoder {
    /// Build a geocoder with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn request_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("address", address)
            .append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocoderError> {
        let response = self
            .client
            .get(self.request_url(address))
            .send()
            .await
            .map_err(|err| map_transport_error(err, &ERROR_KINDS))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error(err, &ERROR_KINDS))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), &ERROR_KINDS));
        }
        parse_point(body.as_ref())
    }
}

fn parse_point(body: &[u8]) -> Result<Option<GeoPoint>, GeocoderError> {
    let decoded: GeocodeResponseDto = serde_json::from_slice(body).map_err(|error| {
        GeocoderError::decode(format!("invalid geocoding payload: {error}"))
    })?;
    decoded.into_domain_point()
}
