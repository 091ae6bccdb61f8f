//! Error types for the reading stats service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::limiter::RETRY_AFTER_SECS;
use crate::models::ErrorResponse;
use crate::scraper::SourceError;

/// Advertised per-client quota.
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Whole requests left in the client's quota.
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

// == Config Error ==
/// Rejected configuration, raised when a component is constructed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// A count that must be positive was zero
    #[error("{0} must be greater than zero")]
    ZeroCapacity(&'static str),

    /// A value could not be parsed
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

// == API Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Username failed validation
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// The source has no data for the user
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The scraping collaborator failed
    #[error("Failed to scrape reading statistics: {0}")]
    ScrapeFailed(String),

    /// Client exhausted its quota for a tier
    #[error("{message}")]
    RateLimited {
        code: &'static str,
        message: &'static str,
        limit: u32,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::UserNotFound(user) => ApiError::UserNotFound(user),
            other => ApiError::ScrapeFailed(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    /// Machine-readable error code used in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidUsername(_) => "invalid_username",
            ApiError::UserNotFound(_) => "user_not_found",
            ApiError::ScrapeFailed(_) => "scraping_failed",
            ApiError::RateLimited { code, .. } => *code,
            ApiError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ScrapeFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorResponse::new(self.code(), self.to_string());

        let limit = match self {
            ApiError::RateLimited { limit, .. } => {
                body = body.with_retry_after(RETRY_AFTER_SECS);
                Some(limit)
            }
            _ => None,
        };

        let mut response = (status, Json(body)).into_response();

        if let Some(limit) = limit {
            let headers = response.headers_mut();
            headers.insert(RATE_LIMIT_LIMIT_HEADER, HeaderValue::from(limit));
            headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(0u32));
            headers.insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }

        response
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_mapping() {
        let err: ApiError = SourceError::UserNotFound("alice".to_string()).into();
        assert!(matches!(err, ApiError::UserNotFound(ref u) if u == "alice"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = SourceError::Unavailable("timeout".to_string()).into();
        assert_eq!(err.code(), "scraping_failed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::InvalidUsername("bad name".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_rate_limited_response_headers() {
        let response = ApiError::RateLimited {
            code: "rate_limit_exceeded",
            message: "Too many requests. Please try again later.",
            limit: 2,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let headers = response.headers();
        assert_eq!(headers[RATE_LIMIT_LIMIT_HEADER], "2");
        assert_eq!(headers[RATE_LIMIT_REMAINING_HEADER], "0");
        assert_eq!(headers[header::RETRY_AFTER], "60");
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::ZeroCapacity("SCRAPE_RATE_LIMIT");
        assert_eq!(err.to_string(), "SCRAPE_RATE_LIMIT must be greater than zero");
    }
}
