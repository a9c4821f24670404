//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{UserPersistenceError, UserRepository};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewUserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed lazy user provisioning.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn ensure_exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let inserted = diesel::insert_into(users::table)
            .values(&NewUserRow { id: id.as_str() })
            .on_conflict(users::id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    UserPersistenceError::query,
                    UserPersistenceError::connection,
                )
            })?;
        Ok(inserted == 1)
    }
}
