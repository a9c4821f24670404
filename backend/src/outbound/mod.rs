//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **cache**: shared cache backed by Redis, or in-process memory
//! - **rate_limit**: fixed-window limiters backed by Redis, or in-process memory
//! - **openweathermap** and **geocoding**: reqwest clients for the upstream
//!   weather provider and geocoder
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod geocoding;
mod http_support;
pub mod openweathermap;
pub mod persistence;
pub mod rate_limit;
pub mod redis;
