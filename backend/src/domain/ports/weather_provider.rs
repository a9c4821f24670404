//! Port for fetching current conditions from the weather provider.
use async_trait::async_trait;

use crate::domain::{GeoPoint, WeatherPayload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by weather provider adapters.
    pub enum WeatherProviderError {
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "weather provider request timed out: {message}",
        /// Network or TLS failure.
        Transport { message: String } => "weather provider transport failed: {message}",
        /// The provider answered with a non-success status.
        Status { message: String } => "weather provider rejected the request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "weather provider response was invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current observation nearest to `point`.
    async fn current_weather(&self, point: GeoPoint)
    -> Result<WeatherPayload, WeatherProviderError>;
}
