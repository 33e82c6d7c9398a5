//! Caller identity supplied by the authentication gateway.
//!
//! Tokens are verified upstream; the gateway forwards the verified subject in
//! [`USER_HEADER`]. Requests without it are rejected before any service code
//! runs.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest};
use serde::Serialize;

use crate::routes::error_response;
use crate::services::ServiceError;

/// Header carrying the verified subject.
pub const USER_HEADER: &str = "X-Authenticated-User";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub sub: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|sub| !sub.is_empty())
            .map(|sub| AuthenticatedUser {
                sub: sub.to_string(),
            });

        ready(user.ok_or_else(|| {
            InternalError::from_response(
                "missing caller identity",
                error_response(ServiceError::Unauthorized),
            )
            .into()
        }))
    }
}
