//! Validated keys for the shared cache.
use thiserror::Error;

use crate::domain::UserId;

const HOME_PAGE_KEY: &str = "weather:home";
const USER_PAGE_PREFIX: &str = "weather:user:";

/// Key identifying a cached weather list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a key after validating that it is non-empty and trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// The single shared key for the home-page list.
    pub fn home_page() -> Self {
        Self(HOME_PAGE_KEY.to_owned())
    }

    /// Per-user key for a user's page. User ids never contain whitespace, so
    /// the result is always valid.
    pub fn user_page(user_id: &UserId) -> Self {
        Self(format!("{USER_PAGE_PREFIX}{user_id}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    #[error("cache key must not be empty")]
    Empty,
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
