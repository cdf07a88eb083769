//! Loan Autofill Server
//!
//! HTTP boundary for entity extraction, pending-entity handoff and form
//! hydration.

pub mod http;
pub mod metrics;
pub mod rate_limit;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_error, record_extraction, record_fields_filled};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use loan_autofill_persistence::{HandoffError, PersistenceError};

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::MalformedRequest(_) => "malformed_request",
            ServerError::InvalidRequest(_) => "invalid_request",
            ServerError::Forbidden(_) => "forbidden",
            ServerError::RateLimit => "rate_limit",
            ServerError::Persistence(_) => "persistence",
            ServerError::Internal(_) => "internal",
        }
    }
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        StatusCode::from(&err)
    }
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ServerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<loan_autofill_core::Error> for ServerError {
    fn from(err: loan_autofill_core::Error) -> Self {
        use loan_autofill_core::Error;
        match err {
            Error::MalformedRequest(msg) => ServerError::MalformedRequest(msg),
            Error::Handoff(msg) => ServerError::InvalidRequest(msg),
            Error::Storage(msg) => ServerError::Persistence(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ServerError {
    fn from(err: PersistenceError) -> Self {
        loan_autofill_core::Error::from(err).into()
    }
}

impl From<HandoffError> for ServerError {
    fn from(err: HandoffError) -> Self {
        match err {
            HandoffError::OriginNotAllowed(origin) => ServerError::Forbidden(origin),
            other => ServerError::InvalidRequest(other.to_string()),
        }
    }
}

impl From<RateLimitError> for ServerError {
    fn from(_: RateLimitError) -> Self {
        ServerError::RateLimit
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        record_error(self.kind());

        // Server-side faults are logged, never echoed
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, "Request rejected");
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StatusCode::from(ServerError::MalformedRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(StatusCode::from(ServerError::RateLimit), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            StatusCode::from(ServerError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let err: ServerError = loan_autofill_core::Error::MalformedRequest("bad json".into()).into();
        assert_eq!(err.to_string(), "Malformed request: bad json");

        let err: ServerError = PersistenceError::InvalidKey("a/b".into()).into();
        assert_eq!(StatusCode::from(err), StatusCode::BAD_REQUEST);

        let err: ServerError = HandoffError::OriginNotAllowed("https://evil".into()).into();
        assert_eq!(StatusCode::from(err), StatusCode::FORBIDDEN);
    }
}
