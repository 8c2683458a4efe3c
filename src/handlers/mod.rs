pub mod admin;
pub mod public;
pub mod wallet;

use axum::body::Bytes;
use serde_json::Value;

use crate::error::ApiError;

/// Parse a raw request body so malformed JSON becomes our own 400 envelope
/// rather than axum's plain-text rejection.
pub(crate) fn parse_json(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed JSON body");
        ApiError::bad_request("Invalid JSON in request body")
    })
}
