//! PostgreSQL-backed `UserLocationRepository`.
//!
//! `attach` and `detach` each run in a single transaction so a record and its
//! association are committed together or not at all.

use async_trait::async_trait;
use diesel::dsl::{exists, not};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    AttachOutcome, DetachOutcome, UserLocationRepository, UserLocationRepositoryError,
};
use crate::domain::{
    CoordinateKey, LocationLabel, UserId, UserLocation, WEATHER_PAYLOAD_VERSION, WeatherRecord,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserLocationRow, NewWeatherRecordRow, UserLocationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_locations, weather_records};

/// Diesel-backed user location associations.
#[derive(Clone)]
pub struct DieselUserLocationRepository {
    pool: DbPool,
}

impl DieselUserLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserLocationRepositoryError {
    map_pool_error(error, UserLocationRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserLocationRepositoryError {
    map_diesel_error(
        error,
        UserLocationRepositoryError::query,
        UserLocationRepositoryError::connection,
    )
}

fn row_to_location(row: UserLocationRow) -> Result<UserLocation, UserLocationRepositoryError> {
    let invalid = |field: &str, err: String| {
        UserLocationRepositoryError::query(format!("stored {field} is invalid: {err}"))
    };
    Ok(UserLocation {
        user_id: UserId::new(row.user_id).map_err(|err| invalid("user id", err.to_string()))?,
        coordinate_key: CoordinateKey::parse(&row.coordinate_key)
            .map_err(|err| invalid("coordinate key", err.to_string()))?,
        location: LocationLabel::new(&row.location)
            .map_err(|err| invalid("location label", err.to_string()))?,
        show_on_home_page: row.show_on_home_page,
    })
}

#[async_trait]
impl UserLocationRepository for DieselUserLocationRepository {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserLocationRow> = user_locations::table
            .filter(user_locations::user_id.eq(user_id.as_str()))
            .order_by((
                user_locations::location.asc(),
                user_locations::coordinate_key.asc(),
            ))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(UserLocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_location).collect()
    }

    async fn find_by_label(
        &self,
        label: &LocationLabel,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<UserLocationRow> = user_locations::table
            .filter(user_locations::location.eq(label.as_str()))
            .select(UserLocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(row_to_location).collect()
    }

    async fn attach(
        &self,
        record: &WeatherRecord,
        location: &UserLocation,
    ) -> Result<AttachOutcome, UserLocationRepositoryError> {
        let payload = serde_json::to_value(&record.payload).map_err(|err| {
            UserLocationRepositoryError::query(format!("failed to encode payload: {err}"))
        })?;
        let new_record = NewWeatherRecordRow {
            coordinate_key: record.coordinate_key.as_str(),
            location: record.location.as_str(),
            payload,
            payload_version: WEATHER_PAYLOAD_VERSION,
            show_on_home_page: record.show_on_home_page,
            updated_at: record.updated_at,
        };
        let new_location = NewUserLocationRow {
            user_id: location.user_id.as_str(),
            coordinate_key: location.coordinate_key.as_str(),
            location: location.location.as_str(),
            show_on_home_page: location.show_on_home_page,
        };

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                // An existing record is left untouched; the scheduled refresh owns it.
                let inserted = diesel::insert_into(weather_records::table)
                    .values(&new_record)
                    .on_conflict(weather_records::coordinate_key)
                    .do_nothing()
                    .execute(conn)
                    .await?;

                let existing: i64 = user_locations::table
                    .filter(user_locations::user_id.eq(new_location.user_id))
                    .filter(user_locations::coordinate_key.eq(new_location.coordinate_key))
                    .count()
                    .get_result(conn)
                    .await?;

                diesel::insert_into(user_locations::table)
                    .values(&new_location)
                    .on_conflict((user_locations::user_id, user_locations::coordinate_key))
                    .do_update()
                    .set(user_locations::location.eq(excluded(user_locations::location)))
                    .execute(conn)
                    .await?;

                Ok(AttachOutcome {
                    record_created: inserted == 1,
                    association_created: existing == 0,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn detach(
        &self,
        user_id: &UserId,
        key: &CoordinateKey,
    ) -> Result<DetachOutcome, UserLocationRepositoryError> {
        let user = user_id.as_str();
        let key = key.as_str();

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(
                    user_locations::table
                        .filter(user_locations::user_id.eq(user))
                        .filter(user_locations::coordinate_key.eq(key)),
                )
                .execute(conn)
                .await?;
                if removed == 0 {
                    return Ok(DetachOutcome::NotFound);
                }

                // Curated home-page records outlive their last association.
                let orphaned = diesel::delete(
                    weather_records::table
                        .filter(weather_records::coordinate_key.eq(key))
                        .filter(weather_records::show_on_home_page.eq(false))
                        .filter(not(exists(
                            user_locations::table
                                .filter(user_locations::coordinate_key.eq(key)),
                        ))),
                )
                .execute(conn)
                .await?;

                Ok(DetachOutcome::Detached {
                    record_deleted: orphaned == 1,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }
}
