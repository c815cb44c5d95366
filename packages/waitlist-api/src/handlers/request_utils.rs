//! Request utilities for HTTP endpoints.

use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use hyper::{body::Bytes, Request};
use percent_encoding::percent_decode_str;
use serde::Deserialize;
use tokio::sync::oneshot;
use tokio::time;
use waitlist_core::guest::{Guest, Mood};
use waitlist_core::time_utils::DEFAULT_QUOTED_TIME;
use waitlist_core::RosterError;
use waitlist_runtime::{ResponseSender, RosterRequest};

use crate::router::{AppState, RouterError};

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Helper function to read request body with timeout
pub async fn read_request_body_with_timeout(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(body.to_bytes())
}

/// Helper function to wait for response with timeout
pub async fn wait_for_response_with_timeout<T>(
    rx: oneshot::Receiver<T>,
    timeout_ms: u64,
) -> Result<T, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, rx)
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Response channel closed: {}", e)))
}

/// Sends a request to the runtime and waits for its answer.
///
/// # Arguments
/// * `state` - Shared application state
/// * `build` - Builds the request around the response sender
pub async fn dispatch<F>(state: &AppState, build: F) -> Result<serde_json::Value, RouterError>
where
    F: FnOnce(ResponseSender) -> RosterRequest,
{
    let (tx, rx) = oneshot::channel();
    state
        .request_tx
        .send(build(tx))
        .await
        .map_err(|e| RouterError::InternalError(format!("Channel closed: {}", e)))?;

    let result = wait_for_response_with_timeout(rx, state.config.response_timeout_ms).await?;
    result.map_err(map_roster_error_to_router_error)
}

/// Map RosterError to appropriate RouterError
pub fn map_roster_error_to_router_error(e: RosterError) -> RouterError {
    match e {
        RosterError::GuestNotFound { .. } | RosterError::GuestDeparted { .. } => {
            RouterError::NotFound(e.to_string())
        }
        RosterError::Timeout => RouterError::Timeout,
        _ => RouterError::InternalError(format!("Runtime error: {}", e)),
    }
}

/// Parses the `{index}` route parameter.
pub fn parse_index(params: &MatchitParams<'_, '_>) -> Result<usize, RouterError> {
    let raw = params.get("index").unwrap_or("");
    raw.parse()
        .map_err(|e| RouterError::BadRequest(format!("Invalid guest index '{}': {}", raw, e)))
}

/// Extracts the optional `at` instant from a query string.
///
/// Accepts RFC 3339, percent-encoded or not. Other keys are ignored.
pub fn parse_at_query(query_str: Option<&str>) -> Result<Option<DateTime<Utc>>, RouterError> {
    let Some(query_str) = query_str else {
        return Ok(None);
    };

    for pair in query_str.split('&') {
        let Some((key, encoded_value)) = pair.split_once('=') else {
            continue;
        };
        if key != "at" {
            continue;
        }
        let decoded_value = percent_decode_str(encoded_value).decode_utf8_lossy();
        let at = DateTime::parse_from_rfc3339(&decoded_value).map_err(|e| {
            RouterError::BadRequest(format!("Invalid at value '{}': {}", decoded_value, e))
        })?;
        return Ok(Some(at.with_timezone(&Utc)));
    }
    Ok(None)
}

/// Guest fields accepted by `POST /guests` and `PUT /guests/{index}`.
///
/// On edit, every omitted field keeps the current value.
#[derive(Debug, Default, Deserialize)]
pub struct GuestPayload {
    pub name: Option<String>,
    pub party_size: Option<u32>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub quoted_time: Option<u32>,
    pub mood: Option<MoodInput>,
    pub notes: Option<String>,
}

impl GuestPayload {
    /// Builds a new guest arriving at `now` unless an arrival is given.
    pub fn into_new_guest(mut self, now: DateTime<Utc>) -> Result<Guest, RouterError> {
        let name = self
            .name
            .take()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| RouterError::BadRequest("Guest name is required".to_string()))?;
        let template = Guest::new(name, 1, now, DEFAULT_QUOTED_TIME, Mood::Happy);
        self.apply(template)
    }

    /// Applies the supplied fields over `original`.
    pub fn apply_to(mut self, original: &Guest) -> Result<Guest, RouterError> {
        let mut updated = original.clone();
        if let Some(name) = self.name.take() {
            if name.trim().is_empty() {
                return Err(RouterError::BadRequest("Guest name is required".to_string()));
            }
            updated.name = name;
        }
        self.apply(updated)
    }

    fn apply(self, mut guest: Guest) -> Result<Guest, RouterError> {
        if let Some(party_size) = self.party_size {
            if party_size == 0 {
                return Err(RouterError::BadRequest(
                    "Party size must be at least 1".to_string(),
                ));
            }
            guest.party_size = party_size;
        }
        if let Some(arrival_time) = self.arrival_time {
            guest.arrival_time = arrival_time;
        }
        if let Some(quoted_time) = self.quoted_time {
            guest.quoted_time = quoted_time;
        }
        if let Some(mood) = self.mood {
            guest.mood = mood.resolve()?;
        }
        if let Some(notes) = self.notes {
            guest.notes = notes;
        }
        Ok(guest)
    }
}

/// Mood as sent by clients: a name such as `"meh"` or an ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MoodInput {
    Ordinal(u64),
    Name(String),
}

impl MoodInput {
    fn resolve(&self) -> Result<Mood, RouterError> {
        let mood = match self {
            MoodInput::Ordinal(ordinal) => usize::try_from(*ordinal)
                .ok()
                .and_then(|ordinal| Mood::ALL.get(ordinal).copied()),
            MoodInput::Name(name) => Mood::parse(name),
        };
        mood.ok_or_else(|| RouterError::BadRequest(format!("Invalid mood {}", self)))
    }
}

impl std::fmt::Display for MoodInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoodInput::Ordinal(ordinal) => write!(f, "{}", ordinal),
            MoodInput::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Guest and position returned by mutating endpoints.
#[derive(Debug, Deserialize, serde::Serialize)]
pub struct GuestPlacement {
    pub index: usize,
    pub guest: Guest,
}

/// Decodes the runtime's `{index, guest}` answer.
pub fn placement_from_value(value: serde_json::Value) -> Result<GuestPlacement, RouterError> {
    serde_json::from_value(value)
        .map_err(|e| RouterError::InternalError(format!("Invalid response from runtime: {}", e)))
}
