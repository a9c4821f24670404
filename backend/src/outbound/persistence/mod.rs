//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between Diesel rows and domain types.
//! Rows and table definitions stay private to this module; connection
//! management goes through the bb8-backed [`DbPool`].
//!
//! ```ignore
//! use weatherboard::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/weather")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_user_location_repository;
mod diesel_user_repository;
mod diesel_weather_record_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_location_repository::DieselUserLocationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_weather_record_repository::DieselWeatherRecordRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
