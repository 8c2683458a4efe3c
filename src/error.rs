// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::payments::PaymentsError;
use crate::query::QueryError;
use crate::zerodb::ZeroDbError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Every variant renders the same envelope: `{ "success": false, "error": ... }`
/// with an optional `message` and, for validation failures, a `details` list.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request (unparseable body or query string)
    #[error("{0}")]
    BadRequest(String),

    // 400 Bad Request (field-level failures, all reported at once)
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    // 400 Bad Request (public forms report the offending field in `error`)
    #[error("{0}")]
    InvalidInput(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 429 Too Many Requests
    #[error("too many requests")]
    RateLimited,

    // 500 Internal Server Error (upstream store or identity failure)
    #[error("{0}")]
    Upstream(String),

    // 500 Internal Server Error (public forms report the failed step in `error`)
    #[error("{0}")]
    StepFailed(String),

    // 502 Bad Gateway (proxied service returned an error)
    #[error("{0}")]
    BadGateway(String),

    // 503 Service Unavailable
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) | ApiError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) | ApiError::StepFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short, machine-checkable label placed in the `error` field
    pub fn label(&self) -> &str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::Validation(_) => "Validation Error",
            ApiError::InvalidInput(msg) | ApiError::StepFailed(msg) => msg,
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::RateLimited => "Rate Limit Exceeded",
            ApiError::Upstream(_) => "Internal Server Error",
            ApiError::BadGateway(_) => "Bad Gateway",
            ApiError::ServiceUnavailable(_) => "Service Unavailable",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation(details) => json!({
                "success": false,
                "error": self.label(),
                "message": "Request validation failed",
                "details": details,
            }),
            ApiError::InvalidInput(msg) | ApiError::StepFailed(msg) => json!({
                "success": false,
                "error": msg,
            }),
            ApiError::RateLimited => json!({
                "success": false,
                "error": self.label(),
                "message": "Too many requests. Please try again later.",
            }),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Upstream(msg)
            | ApiError::BadGateway(msg)
            | ApiError::ServiceUnavailable(msg) => json!({
                "success": false,
                "error": self.label(),
                "message": msg,
            }),
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(details: Vec<String>) -> Self {
        ApiError::Validation(details)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream(message.into())
    }

    pub fn step_failed(message: impl Into<String>) -> Self {
        ApiError::StepFailed(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(msg) => ApiError::unauthorized(msg),
            AuthError::Forbidden(msg) => ApiError::forbidden(msg),
            AuthError::Service(msg) => {
                // An unreachable identity service must never grant access
                tracing::error!(error = %msg, "Identity service failure");
                ApiError::upstream("Authentication verification failed")
            }
        }
    }
}

impl From<ZeroDbError> for ApiError {
    fn from(err: ZeroDbError) -> Self {
        // Don't expose upstream response bodies to clients
        tracing::error!(error = %err, "ZeroDB request failed");
        ApiError::upstream("An error occurred while processing your request")
    }
}

impl From<PaymentsError> for ApiError {
    fn from(err: PaymentsError) -> Self {
        match &err {
            PaymentsError::Unauthorized => ApiError::unauthorized(err.client_message()),
            PaymentsError::Failed { .. } => {
                tracing::error!(error = %err, "Payments API request failed");
                ApiError::bad_gateway(err.client_message())
            }
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_details() {
        let err = ApiError::validation(vec!["Valid email is required".to_string()]);
        let body = err.to_json();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation Error");
        assert_eq!(body["details"][0], "Valid email is required");
    }

    #[test]
    fn invalid_input_puts_message_in_error() {
        let body = ApiError::invalid_input("email must be a valid email address").to_json();
        assert_eq!(body["error"], "email must be a valid email address");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn step_failure_is_500_with_detail_in_error() {
        let err = ApiError::step_failed("Failed to store contact submission");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_json(),
            json!({ "success": false, "error": "Failed to store contact submission" })
        );
    }

    #[test]
    fn rate_limited_maps_to_429() {
        let err = ApiError::RateLimited;
        assert_eq!(err.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.to_json()["error"], "Rate Limit Exceeded");
    }

    #[test]
    fn identity_service_failure_is_not_unauthenticated() {
        let err: ApiError = AuthError::Service("timeout".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = AuthError::Forbidden("Insufficient permissions".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
