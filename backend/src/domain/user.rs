//! Caller identity as supplied by the external identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Error;

/// Maximum accepted length of an identity-provider subject.
pub const USER_ID_MAX: usize = 255;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// The identity is empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identity contains whitespace.
    #[error("user id must not contain whitespace")]
    ContainsWhitespace,
    /// The identity exceeds [`USER_ID_MAX`] characters.
    #[error("user id must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Opaque identity string issued by the identity provider.
///
/// The value is never interpreted; it only has to be a stable, printable
/// token so it can key store rows, cache entries and rate-limit windows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use weatherboard::domain::UserId;
    ///
    /// let id = UserId::new("user_2NNEqL2nrIRdJ194ndJqAHwEfxC").expect("valid id");
    /// assert_eq!(id.as_str(), "user_2NNEqL2nrIRdJ194ndJqAHwEfxC");
    /// assert!(UserId::new("has space").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(UserIdValidationError::ContainsWhitespace);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserIdValidationError::TooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// No identity was supplied; `client` distinguishes anonymous visitors
    /// for rate limiting (typically the peer address).
    Anonymous {
        /// Client fingerprint used as the rate-limit identity.
        client: String,
    },
    /// The identity provider vouched for this user.
    Authenticated(UserId),
}

impl Caller {
    /// Return the authenticated user, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Authenticated(user_id) => Some(user_id),
            Self::Anonymous { .. } => None,
        }
    }

    /// Require an authenticated user or fail with `unauthorized`.
    pub fn require_user(&self) -> Result<&UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("sign in to manage your locations"))
    }
}
