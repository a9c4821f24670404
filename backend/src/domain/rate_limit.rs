//! Fixed-window rate limiting primitives.
//!
//! Time is cut into consecutive windows of `window` length aligned to the
//! Unix epoch. Each key may make `max_requests` requests per window; the
//! counter resets at the next window boundary.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Caller, UserId};

/// Validation errors for [`FixedWindowPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedWindowPolicyError {
    /// `max_requests` was zero.
    #[error("rate limit must allow at least one request per window")]
    ZeroRequests,
    /// The window was shorter than one second.
    #[error("rate limit window must be at least one second")]
    WindowTooShort,
}

/// `max_requests` per `window`, per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindowPolicy {
    max_requests: u32,
    window: Duration,
}

impl FixedWindowPolicy {
    /// Validate and construct a policy. Windows are whole seconds.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use weatherboard::domain::FixedWindowPolicy;
    ///
    /// let policy = FixedWindowPolicy::new(50, Duration::from_secs(3600)).expect("valid policy");
    /// assert_eq!(policy.max_requests(), 50);
    /// assert!(FixedWindowPolicy::new(0, Duration::from_secs(60)).is_err());
    /// ```
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, FixedWindowPolicyError> {
        if max_requests == 0 {
            return Err(FixedWindowPolicyError::ZeroRequests);
        }
        if window.as_secs() == 0 {
            return Err(FixedWindowPolicyError::WindowTooShort);
        }
        Ok(Self {
            max_requests,
            window: Duration::from_secs(window.as_secs()),
        })
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn window_secs(&self) -> i64 {
        i64::try_from(self.window.as_secs()).unwrap_or(i64::MAX)
    }

    /// Index of the window containing `now`.
    pub fn window_index(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp().div_euclid(self.window_secs())
    }

    /// Instant at which window `index` starts.
    pub fn window_start(&self, index: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(index.saturating_mul(self.window_secs()), 0)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Decide on a request given the window's counter *after* counting it.
    pub fn decide(&self, count: u64, window_index: i64) -> RateLimitDecision {
        let used = u32::try_from(count).unwrap_or(u32::MAX);
        RateLimitDecision {
            allowed: count <= u64::from(self.max_requests),
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(used),
            resets_at: self.window_start(window_index.saturating_add(1)),
        }
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub resets_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, never below one.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let secs = (self.resets_at - now).num_seconds();
        u64::try_from(secs).unwrap_or(0).max(1)
    }
}

/// Identity a rate-limit counter is kept for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Key for a caller: the user id when authenticated, otherwise the
    /// anonymous client fingerprint.
    ///
    /// # Examples
    /// ```
    /// use weatherboard::domain::{Caller, RateLimitKey, UserId};
    ///
    /// let anon = Caller::Anonymous { client: "10.0.0.1".to_owned() };
    /// assert_eq!(RateLimitKey::for_caller(&anon).as_str(), "anon:10.0.0.1");
    /// let user = Caller::Authenticated(UserId::new("u1").expect("valid id"));
    /// assert_eq!(RateLimitKey::for_caller(&user).as_str(), "user:u1");
    /// ```
    pub fn for_caller(caller: &Caller) -> Self {
        match caller {
            Caller::Authenticated(user_id) => Self::for_user(user_id),
            Caller::Anonymous { client } => Self(format!("anon:{client}")),
        }
    }

    pub fn for_user(user_id: &UserId) -> Self {
        Self(format!("user:{user_id}"))
    }

    /// Narrow the key to a single operation so it gets its own budget.
    pub fn scoped(&self, operation: &str) -> Self {
        Self(format!("{operation}:{}", self.0))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
