//! Reqwest-backed OpenWeatherMap current-weather client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::domain::ports::{WeatherProvider, WeatherProviderError};
use crate::domain::{GeoPoint, WeatherPayload};
use crate::outbound::http_support::{UpstreamErrorKinds, map_status_error, map_transport_error};

/// Public current-weather endpoint.
pub const DEFAULT_OPEN_WEATHER_MAP_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

const ERROR_KINDS: UpstreamErrorKinds<WeatherProviderError> = UpstreamErrorKinds {
    timeout: WeatherProviderError::timeout,
    transport: WeatherProviderError::transport,
    status: WeatherProviderError::status,
};

/// Weather provider that performs one GET per lookup.
pub struct OpenWeatherMapProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl OpenWeatherMapProvider {
    /// Build a provider with an explicit request timeout.
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

    fn request_url(&self, point: GeoPoint) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &point.latitude().to_string())
            .append_pair("lon", &point.longitude().to_string())
            .append_pair("appid", &self.api_key);
        url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMapProvider {
    async fn current_weather(
        &self,
        point: GeoPoint,
    ) -> Result<WeatherPayload, WeatherProviderError> {
        let response = self
            .client
            .get(self.request_url(point))
            .header(reqwest::header::ACCEPT, "application/json")
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
        parse_payload(body.as_ref())
    }
}

fn parse_payload(body: &[u8]) -> Result<WeatherPayload, WeatherProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        WeatherProviderError::decode(format!("invalid OpenWeatherMap payload: {error}"))
    })
}
