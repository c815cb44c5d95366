//! Roster endpoints addressed by guest position.

use chrono::Utc;
use hyper::{body::Bytes, Request, Response};
use serde_json::json;
use waitlist_runtime::RosterRequest;

use crate::router::{AppState, RouterError};

use super::request_utils::{
    dispatch, map_roster_error_to_router_error, parse_at_query, parse_index,
    placement_from_value, read_request_body_with_timeout, GuestPayload, MatchitParams,
};
use super::response::json_success;

/// Lists the roster as countdown rows.
///
/// # Endpoint
/// `GET /guests[?at=<rfc3339>]`
///
/// # Response
/// - **200 OK**: Countdown board projected at `at`, or now
/// ```json
/// {
///   "generated_at": "2024-03-01T18:12:00Z",
///   "rows": [{ "index": 0, "number": 1, "name": "Ada", "remaining": "3 minutes", ... }]
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: `at` is not RFC 3339
pub async fn list_guests(
    req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let now = parse_at_query(req.uri().query())?.unwrap_or_else(Utc::now);
    let board = state.store.board(now, state.display_offset);
    json_success(200, board)
}

/// Adds a guest.
///
/// # Endpoint
/// `POST /guests`
///
/// # Request Body
/// ```json
/// { "name": "Ada", "party_size": 4, "quoted_time": 15, "mood": "happy", "notes": "booth" }
/// ```
/// Only `name` is required. `arrival_time` defaults to now.
///
/// # Response
/// - **201 Created**: `{ "index": 0, "guest": { ... } }`
///
/// # Errors
/// - **400 Bad Request**: Missing name, zero party size or unknown mood
/// - **408 Request Timeout**: Runtime did not answer in time
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:8080/guests \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Ada", "party_size": 4, "quoted_time": 15}'
/// ```
pub async fn add_guest(
    req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let payload: GuestPayload = serde_json::from_slice(&body_bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))?;
    let guest = payload.into_new_guest(Utc::now())?;

    let value = dispatch(&state, |response| RosterRequest::AddGuest { guest, response }).await?;
    json_success(201, placement_from_value(value)?)
}

/// Edits the guest at a position.
///
/// # Endpoint
/// `PUT /guests/{index}`
///
/// Omitted fields keep their current value, including `arrival_time`.
/// The edited guest may move; the response carries its new index.
///
/// # Errors
/// - **400 Bad Request**: Invalid index or payload
/// - **404 Not Found**: No guest at that position, or it changed meanwhile
pub async fn edit_guest(
    req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let index = parse_index(&params)?;
    let original = state
        .store
        .guest_at(index)
        .map_err(map_roster_error_to_router_error)?;

    let body_bytes = read_request_body_with_timeout(req, state.config.request_timeout_ms).await?;
    let payload: GuestPayload = serde_json::from_slice(&body_bytes)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))?;
    let updated = payload.apply_to(&original)?;

    let value = dispatch(&state, |response| RosterRequest::ReplaceGuest {
        original,
        updated,
        response,
    })
    .await?;
    json_success(200, placement_from_value(value)?)
}

/// Removes the guest at a position without seating them.
///
/// # Endpoint
/// `DELETE /guests/{index}`
///
/// # Response
/// - **200 OK**: `{ "removed": true }`
pub async fn remove_guest(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    depart(params, state, |guest, response| RosterRequest::RemoveGuest {
        guest,
        response,
    })
    .await
}

/// Seats the guest at a position.
///
/// # Endpoint
/// `POST /guests/{index}/seat`
///
/// # Response
/// - **200 OK**: `{ "removed": true }`
pub async fn seat_guest(
    _req: Request<hyper::body::Incoming>,
    params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    depart(params, state, |guest, response| RosterRequest::SeatGuest {
        guest,
        response,
    })
    .await
}

async fn depart<F>(
    params: MatchitParams<'_, '_>,
    state: AppState,
    build: F,
) -> Result<Response<Bytes>, RouterError>
where
    F: FnOnce(waitlist_core::Guest, waitlist_runtime::ResponseSender) -> RosterRequest,
{
    let index = parse_index(&params)?;
    let guest = state
        .store
        .guest_at(index)
        .map_err(map_roster_error_to_router_error)?;

    let value = dispatch(&state, |response| build(guest, response)).await?;
    // The guest may have been removed by another request in between
    if value.get("removed").and_then(|v| v.as_bool()) != Some(true) {
        return Err(RouterError::NotFound(format!(
            "Guest at index {} is no longer waiting",
            index
        )));
    }
    json_success(200, json!({ "removed": true }))
}
