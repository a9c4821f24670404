//! Port for resolving free-form addresses to coordinates.
use async_trait::async_trait;

use crate::domain::GeoPoint;

use super::define_port_error;

define_port_error! {
    /// Errors raised by geocoding adapters.
    pub enum GeocoderError {
        /// The request exceeded the configured timeout.
        Timeout { message: String } => "geocoder request timed out: {message}",
        /// Network or TLS failure.
        Transport { message: String } => "geocoder transport failed: {message}",
        /// The service answered with a non-success status.
        Status { message: String } => "geocoder rejected the request: {message}",
        /// The response body could not be interpreted.
        Decode { message: String } => "geocoder response was invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address` to its best match. `Ok(None)` means the service
    /// found no match.
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocoderError>;
}
