//! PostgreSQL-backed `WeatherRecordRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{WeatherRecordRepository, WeatherRecordRepositoryError};
use crate::domain::{CoordinateKey, WEATHER_PAYLOAD_VERSION, WeatherPayload, WeatherRecord};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::WeatherRecordRow;
use super::pool::{DbPool, PoolError};
use super::schema::weather_records;

/// Diesel-backed weather record reads.
#[derive(Clone)]
pub struct DieselWeatherRecordRepository {
    pool: DbPool,
}

impl DieselWeatherRecordRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> WeatherRecordRepositoryError {
    map_pool_error(error, WeatherRecordRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> WeatherRecordRepositoryError {
    map_diesel_error(
        error,
        WeatherRecordRepositoryError::query,
        WeatherRecordRepositoryError::connection,
    )
}

/// Convert a stored row, validating its key and payload version.
pub(crate) fn row_to_record(
    row: WeatherRecordRow,
) -> Result<WeatherRecord, WeatherRecordRepositoryError> {
    if row.payload_version != WEATHER_PAYLOAD_VERSION {
        return Err(WeatherRecordRepositoryError::decode(format!(
            "record {} has payload version {}, expected {WEATHER_PAYLOAD_VERSION}",
            row.coordinate_key, row.payload_version
        )));
    }
    let coordinate_key = CoordinateKey::parse(&row.coordinate_key).map_err(|err| {
        WeatherRecordRepositoryError::decode(format!(
            "invalid coordinate key {:?}: {err}",
            row.coordinate_key
        ))
    })?;
    let payload: WeatherPayload = serde_json::from_value(row.payload).map_err(|err| {
        WeatherRecordRepositoryError::decode(format!("record {coordinate_key}: {err}"))
    })?;
    Ok(WeatherRecord {
        coordinate_key,
        payload,
        location: row.location,
        show_on_home_page: row.show_on_home_page,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl WeatherRecordRepository for DieselWeatherRecordRepository {
    async fn list_home_page(
        &self,
        limit: usize,
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<WeatherRecordRow> = weather_records::table
            .filter(weather_records::show_on_home_page.eq(true))
            .order_by((
                weather_records::location.asc(),
                weather_records::coordinate_key.asc(),
            ))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(WeatherRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }

    async fn find_by_keys(
        &self,
        keys: &[CoordinateKey],
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let raw_keys: Vec<&str> = keys.iter().map(CoordinateKey::as_str).collect();
        let rows: Vec<WeatherRecordRow> = weather_records::table
            .filter(weather_records::coordinate_key.eq_any(raw_keys))
            .select(WeatherRecordRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }
}
