//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{WeatherCommand, WeatherQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub weather: Arc<dyn WeatherQuery>,
    pub locations: Arc<dyn WeatherCommand>,
}

impl HttpState {
    pub fn new(weather: Arc<dyn WeatherQuery>, locations: Arc<dyn WeatherCommand>) -> Self {
        Self { weather, locations }
    }
}
