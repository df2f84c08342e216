//! Error types surfaced by the limiter.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body sent with every `429 Too Many Requests`.
pub const RATE_LIMITED_BODY: &str = "Rate limit exceeded";

/// Body sent when the fail-closed policy refuses a request.
pub const UNAVAILABLE_BODY: &str = "Rate limiter unavailable";

/// Responses the rate limiting middleware short-circuits with.
///
/// Both are plain text with no extra headers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Rate limiter store unavailable")]
    LimiterUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_BODY),
            AppError::LimiterUnavailable => (StatusCode::SERVICE_UNAVAILABLE, UNAVAILABLE_BODY),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Invalid [`crate::application::services::LimiterSettings`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("max requests per window must be greater than 0")]
    ZeroMaxRequests,

    #[error("window duration must be greater than 0")]
    ZeroWindow,

    #[error("window duration must not exceed {0:?}")]
    WindowTooLarge(std::time::Duration),

    #[error("key prefix must not be empty")]
    EmptyKeyPrefix,

    #[error("store timeout must be greater than 0")]
    ZeroStoreTimeout,
}
