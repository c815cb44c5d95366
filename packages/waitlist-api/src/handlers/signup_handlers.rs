//! Self-registration relay and snapshot control.

use hyper::{body::Bytes, Request, Response};
use waitlist_core::signup::Signup;
use waitlist_runtime::RosterRequest;

use crate::router::{AppState, RouterError};

use super::request_utils::{
    dispatch, placement_from_value, read_request_body_with_timeout, MatchitParams,
};
use super::response::json_success;

/// Registers a relayed signup.
///
/// # Endpoint
/// `POST /signups`
///
/// # Request Body
/// ```json
/// { "name": "Kai", "partySize": "3" }
/// ```
/// Values are strings. Missing or unusable fields fall back to defaults.
///
/// # Response
/// - **201 Created**: `{ "index": 0, "guest": { ... } }`
///
/// # Errors
/// - **400 Bad Request**: Body is not a string mapping
pub async fn signup(
    req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let signup: Signup = serde_json::from_slice(&body_bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse signup: {}", e)))?;

    let value = dispatch(&state, |response| RosterRequest::Signup { signup, response }).await?;
    json_success(201, placement_from_value(value)?)
}

/// Forces a snapshot write.
///
/// # Endpoint
/// `POST /persist`
///
/// # Response
/// - **200 OK**: `{ "persisted": 3 }`
///
/// # Errors
/// - **500 Internal Server Error**: The snapshot could not be written
pub async fn persist(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let value = dispatch(&state, |response| RosterRequest::Persist { response }).await?;
    json_success(200, value)
}
