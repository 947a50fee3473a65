//! Error types for the activities service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Service error types.
///
/// The `Display` text of each variant is the literal `detail` string sent to
/// the client, so the wording here is part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Activity not found")]
    NotFound,

    #[error("Student is already signed up")]
    AlreadyRegistered,

    #[error("Student is not signed up for this activity")]
    NotRegistered,

    #[error("Activity is full")]
    ActivityFull,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl ServiceError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::AlreadyRegistered
            | ServiceError::NotRegistered
            | ServiceError::ActivityFull => StatusCode::BAD_REQUEST,
            ServiceError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<axum::extract::rejection::QueryRejection> for ServiceError {
    fn from(e: axum::extract::rejection::QueryRejection) -> Self {
        ServiceError::InvalidRequest(e.body_text())
    }
}
