//! Google Geocoding outbound adapter.
//!
//! Implements the `Geocoder` port. Only the first result's
//! `geometry.location` is consumed.

mod dto;
mod google;

pub use google::{DEFAULT_GOOGLE_GEOCODING_URL, GoogleGeocoder};
