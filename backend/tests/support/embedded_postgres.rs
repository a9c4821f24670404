//! Shared embedded PostgreSQL helpers for the Diesel integration suites.
//!
//! Each test gets its own database cloned from a template that already has
//! the migrations applied. The template name carries a hash of the
//! migrations directory so a schema change never reuses a stale template.
//! Seeding and inspection go through `postgres` so they stay independent of
//! the adapters under test.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;
use weatherboard::domain::ports::UserPersistenceError;
use weatherboard::outbound::persistence::run_pending_migrations;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "weatherboard_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, UserPersistenceError> {
    let hash = hash_directory(migrations_dir())
        .map_err(|err| UserPersistenceError::query(format!("hash migrations: {err}")))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Creates or reuses the migrated template database.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, UserPersistenceError> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| UserPersistenceError::query(format!("template check: {err:?}")))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| UserPersistenceError::query(format!("create template: {err:?}")))?;

        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url)
            .map_err(|err| UserPersistenceError::query(format!("migration: {err}")))?;
    }

    Ok(template_name)
}

fn provision_template_database_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, UserPersistenceError> {
    let template_name = ensure_template_database(cluster).map_err(|error| {
        UserPersistenceError::query(format!(
            "template check: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}"
        ))
    })?;
    let db_name = format!("test_{}", Uuid::new_v4());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|error| {
            UserPersistenceError::query(format!(
                "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
            ))
        })
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(
    cluster: &ClusterHandle,
) -> Result<TemporaryDatabase, UserPersistenceError> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_template_database_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        };
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| {
        UserPersistenceError::query("create database from template: exhausted retries")
    }))
}

fn connect(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))
}

/// Inserts a home-page record the way the scheduled refresh would.
pub fn seed_curated_record(url: &str, coordinate_key: &str, location: &str) -> Result<(), String> {
    let payload = format!(r#"{{"name":"{location}"}}"#);
    connect(url)?
        .execute(
            concat!(
                "INSERT INTO weather_records ",
                "(coordinate_key, location, payload, show_on_home_page) ",
                "VALUES ($1, $2, $3::text::jsonb, TRUE)"
            ),
            &[&coordinate_key, &location, &payload],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Overwrites a stored payload with JSON that no longer matches the schema.
pub fn corrupt_payload(url: &str, coordinate_key: &str) -> Result<(), String> {
    connect(url)?
        .execute(
            r#"UPDATE weather_records SET payload = '"corrupted"'::jsonb WHERE coordinate_key = $1"#,
            &[&coordinate_key],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(())
}

/// Number of `weather_records` rows stored under `coordinate_key`.
pub fn weather_record_rows(url: &str, coordinate_key: &str) -> Result<i64, String> {
    let row = connect(url)?
        .query_one(
            "SELECT COUNT(*) FROM weather_records WHERE coordinate_key = $1",
            &[&coordinate_key],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Number of `user_locations` rows referencing `coordinate_key`.
pub fn association_rows(url: &str, coordinate_key: &str) -> Result<i64, String> {
    let row = connect(url)?
        .query_one(
            "SELECT COUNT(*) FROM user_locations WHERE coordinate_key = $1",
            &[&coordinate_key],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}
