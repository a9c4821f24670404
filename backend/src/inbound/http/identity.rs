//! Caller identity extraction.
//!
//! Authentication happens upstream: the identity gateway in front of this
//! service sets [`AUTHENTICATED_USER_HEADER`] for signed-in users. Requests
//! without it are anonymous and are keyed by peer address for rate limiting.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::{Caller, Error, UserId};

/// Header carrying the authenticated user's opaque identifier.
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

/// Handler argument resolving the request's [`Caller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(Caller);

impl Identity {
    /// The resolved caller, authenticated or anonymous.
    pub fn caller(&self) -> &Caller {
        &self.0
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.0.require_user().cloned()
    }
}

fn invalid_identity(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid {AUTHENTICATED_USER_HEADER} header: {reason}"))
        .with_details(json!({ "field": AUTHENTICATED_USER_HEADER, "code": "invalid_user_id" }))
}

fn resolve_caller(req: &HttpRequest) -> Result<Caller, Error> {
    match req.headers().get(AUTHENTICATED_USER_HEADER) {
        Some(value) => {
            let raw = value.to_str().map_err(invalid_identity)?;
            let user_id = UserId::new(raw).map_err(invalid_identity)?;
            Ok(Caller::Authenticated(user_id))
        }
        None => {
            let client = req
                .peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_owned());
            Ok(Caller::Anonymous { client })
        }
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve_caller(req).map(Identity))
    }
}
