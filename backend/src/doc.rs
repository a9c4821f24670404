//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the weather and health endpoints plus the schema
//! wrappers from [`crate::inbound::http::schemas`], so domain types never
//! depend on utoipa. The document backs Swagger UI in debug builds and is
//! exported by the `openapi-dump` binary.

use crate::inbound::http::schemas::{
    DisplayWeatherSchema, ErrorCodeSchema, ErrorSchema, WeatherSourceSchema,
};
use crate::inbound::http::weather::{AddLocationPayload, WeatherSetResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Describe the gateway-supplied identity header as a security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AuthenticatedUser",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Authenticated-User",
                "Opaque user id set by the identity gateway. Omit for anonymous access.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Weatherboard API",
        description = "Current weather for a curated home page and per-user saved locations."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::weather::get_home_weather,
        crate::inbound::http::weather::get_my_weather,
        crate::inbound::http::weather::add_location,
        crate::inbound::http::weather::remove_location,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        WeatherSetResponse,
        AddLocationPayload,
        DisplayWeatherSchema,
        WeatherSourceSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "weather", description = "Home-page and per-user weather"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
