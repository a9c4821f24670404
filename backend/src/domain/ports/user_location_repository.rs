//! Port for user location associations and the record lifecycle tied to them.
use async_trait::async_trait;

use crate::domain::{CoordinateKey, LocationLabel, UserId, UserLocation, WeatherRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user location adapters.
    pub enum UserLocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user location repository query failed: {message}",
    }
}

/// What [`UserLocationRepository::attach`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachOutcome {
    /// A new weather record was inserted; `false` means an existing record
    /// with the same key was reused untouched.
    pub record_created: bool,
    /// A new association was inserted; `false` means the existing one was
    /// relabelled.
    pub association_created: bool,
}

/// What [`UserLocationRepository::detach`] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    /// The user had no association for that key.
    NotFound,
    /// The association was removed.
    Detached {
        /// The record lost its last reference and was deleted as well.
        record_deleted: bool,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserLocationRepository: Send + Sync {
    /// A user's associations ordered by label ascending, at most `limit`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError>;

    /// Every association, across users, carrying `label`.
    async fn find_by_label(
        &self,
        label: &LocationLabel,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError>;

    /// Atomically insert `record` unless its key already exists, then upsert
    /// the association.
    async fn attach(
        &self,
        record: &WeatherRecord,
        location: &UserLocation,
    ) -> Result<AttachOutcome, UserLocationRepositoryError>;

    /// Atomically remove the association and, when no association references
    /// the record any more, the record itself.
    async fn detach(
        &self,
        user_id: &UserId,
        key: &CoordinateKey,
    ) -> Result<DetachOutcome, UserLocationRepositoryError>;
}
