//! Application error type.
//!
//! Every failure that reaches the transport layer is an [`AppError`]: a status
//! code paired with a message. The response body is always
//! `{"message": "..."}`.
//!
//! Persistence and codec failures are logged where they happen and then
//! replaced by one of the fixed-message constructors below, so raw driver
//! output never reaches a caller.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
pub const MSG_INSUFFICIENT_PRIVILEGES: &str = "insufficient privileges";
pub const MSG_NOT_AUTHORIZED: &str = "not authorized";
pub const MSG_INVALID_AUTH_FORMAT: &str = "invalid authorization format";
pub const MSG_INVALID_ID: &str = "invalid id";
pub const MSG_INVALID_EMAIL: &str = "Error invalid email";
pub const MSG_BAD_EMAIL_OR_PASSWORD: &str = "Bad email or password";
pub const MSG_NOT_FOUND: &str = "Not Found";
pub const MSG_CANNOT_FOLLOW_SELF: &str = "Error you can't follow you";
pub const MSG_COULD_NOT_INSERT: &str = "Error could not insert";
pub const MSG_INTERNAL: &str = "Internal server error";
pub const MSG_TIMEOUT: &str = "timeout exceeded";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    fn fixed(status: StatusCode, message: &'static str) -> Self {
        Self::new(status, anyhow!(message))
    }

    /// Missing or malformed credential.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    /// Authenticated, but not allowed to touch the resource.
    pub fn unauthorized() -> Self {
        Self::fixed(StatusCode::UNAUTHORIZED, MSG_UNAUTHORIZED)
    }

    pub fn insufficient_privileges() -> Self {
        Self::fixed(StatusCode::UNAUTHORIZED, MSG_INSUFFICIENT_PRIVILEGES)
    }

    pub fn invalid_id() -> Self {
        Self::fixed(StatusCode::BAD_REQUEST, MSG_INVALID_ID)
    }

    pub fn invalid_email() -> Self {
        Self::fixed(StatusCode::BAD_REQUEST, MSG_INVALID_EMAIL)
    }

    pub fn bad_email_or_password() -> Self {
        Self::fixed(StatusCode::BAD_REQUEST, MSG_BAD_EMAIL_OR_PASSWORD)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn not_found() -> Self {
        Self::fixed(StatusCode::NOT_FOUND, MSG_NOT_FOUND)
    }

    pub fn cannot_follow_self() -> Self {
        Self::fixed(StatusCode::CONFLICT, MSG_CANNOT_FOLLOW_SELF)
    }

    pub fn could_not_insert() -> Self {
        Self::fixed(StatusCode::INTERNAL_SERVER_ERROR, MSG_COULD_NOT_INSERT)
    }

    pub fn internal() -> Self {
        Self::fixed(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }

    pub fn timeout() -> Self {
        Self::fixed(StatusCode::BAD_GATEWAY, MSG_TIMEOUT)
    }

    /// The message rendered in the response body.
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

/// Unexpected errors are logged with their full chain and surface as a
/// generic internal error.
impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        let err: Error = err.into();
        tracing::error!(error = ?err, "unhandled error");
        AppError::internal()
    }
}
