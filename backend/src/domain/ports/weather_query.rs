//! Driving ports for the weather dashboard.
//!
//! Inbound adapters use these traits to read and mutate weather lists
//! without importing persistence, cache or upstream concerns.

use async_trait::async_trait;

use crate::domain::{Caller, CoordinateKey, DisplayWeather, Error, LocationLabel, UserId};

/// Where a weather list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    /// Served from a live cache entry.
    Cache,
    /// Recomputed from the store.
    Computed,
}

/// A weather list plus its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSet {
    /// Display rows in page order.
    pub weather: Vec<DisplayWeather>,
    /// Whether the rows were served from the cache or computed.
    pub source: WeatherSource,
}

/// Input for [`WeatherCommand::add_location_by_address`].
#[derive(Debug, Clone, PartialEq)]
pub struct AddLocationRequest {
    /// Authenticated owner of the new location.
    pub user_id: UserId,
    /// Label shown on the user's page.
    pub location: LocationLabel,
    /// Free-form address passed to the geocoder; trimmed before use.
    pub address: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherQuery: Send + Sync {
    /// Home-page weather for any caller, anonymous or not.
    async fn home_page(&self, caller: &Caller) -> Result<WeatherSet, Error>;

    /// The authenticated user's own locations.
    async fn user_page(&self, user_id: &UserId) -> Result<WeatherSet, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherCommand: Send + Sync {
    /// Geocode an address, fetch its weather and attach it to the user.
    /// Returns the refreshed user list.
    async fn add_location_by_address(
        &self,
        request: AddLocationRequest,
    ) -> Result<WeatherSet, Error>;

    /// Detach a location from the user. Returns the refreshed user list.
    async fn remove_location(
        &self,
        user_id: &UserId,
        key: &CoordinateKey,
    ) -> Result<WeatherSet, Error>;
}
