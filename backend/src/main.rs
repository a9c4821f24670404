//! Backend entry-point: loads settings, applies migrations, wires adapters
//! and serves the weather API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use weatherboard::inbound::http::health::HealthState;
use weatherboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use weatherboard::settings::WeatherboardSettings;

use server::{ServerConfig, build_http_state, create_server};

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = WeatherboardSettings::load_from_iter(std::env::args_os())
        .map_err(|err| startup_error("failed to load settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid settings", err))?;
    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("invalid settings", err))?
        .to_owned();

    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| startup_error("migration task panicked", err))?
        .map_err(|err| startup_error("database migrations failed", err))?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| startup_error("database pool", err))?;
    let http_state = build_http_state(&settings, pool).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, http_state))?;
    info!(%bind_addr, "weatherboard listening");
    server.await
}
