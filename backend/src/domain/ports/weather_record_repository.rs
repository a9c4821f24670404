//! Read side of weather record persistence.
use async_trait::async_trait;

use crate::domain::{CoordinateKey, WeatherRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by weather record adapters.
    pub enum WeatherRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "weather record repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "weather record repository query failed: {message}",
        /// A stored payload could not be decoded.
        Decode { message: String } => "stored weather payload is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherRecordRepository: Send + Sync {
    /// Home-page-visible records ordered by location ascending, at most `limit`.
    async fn list_home_page(
        &self,
        limit: usize,
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError>;

    /// Records for the given keys, in no particular order. Missing keys are
    /// silently absent from the result.
    async fn find_by_keys(
        &self,
        keys: &[CoordinateKey],
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError>;
}
