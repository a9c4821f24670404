//! Weatherboard backend library.
//!
//! Hexagonal layout: [`domain`] holds the weather service and its ports,
//! [`inbound`] adapts HTTP onto the driving ports and [`outbound`] implements
//! the driven ports for PostgreSQL, Redis and the upstream APIs.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
