//! Success and error envelopes for HTTP responses.

use hyper::{body::Bytes, Response};
use serde::Serialize;

use crate::router::RouterError;

/// `{ "success": true, "data": ... }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Error body inside an [`ErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// HTTP status code as string
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `{ "success": false, "error": { ... } }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ApiError,
}

/// Wraps `data` in a success envelope.
pub fn success_response<T: Serialize>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Builds an error envelope for `code`.
pub fn error_response(code: u16, message: String, details: Option<String>) -> ErrorResponse {
    ErrorResponse {
        success: false,
        error: ApiError {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// Serializes `data` in a success envelope and builds the HTTP response.
pub fn json_success<T: Serialize>(status: u16, data: T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(&success_response(data))
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Builds a JSON HTTP response from already serialized bytes.
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}
