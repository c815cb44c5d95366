//! Read-only display endpoints.

use hyper::{body::Bytes, Request, Response};
use serde::Serialize;
use waitlist_core::time_utils::quote_time_choices;

use crate::router::{AppState, RouterError};

use super::request_utils::MatchitParams;
use super::response::json_success;

/// One quote choice offered to staff.
#[derive(Debug, Serialize)]
pub struct QuoteChoice {
    pub minutes: u32,
    pub label: String,
}

/// Returns the countdown board last published by the runtime.
///
/// # Endpoint
/// `GET /board`
///
/// The board is refreshed on the runtime's countdown interval, so it may
/// lag a mutation by up to that interval. Use `GET /guests` for a fresh
/// projection.
pub async fn board(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let board = state.board_rx.borrow().clone();
    json_success(200, board)
}

/// Lists the quote choices with their spoken labels.
///
/// # Endpoint
/// `GET /quote-times`
pub async fn quote_times(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    _state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let choices: Vec<QuoteChoice> = quote_time_choices()
        .into_iter()
        .map(|(minutes, label)| QuoteChoice { minutes, label })
        .collect();
    json_success(200, choices)
}

/// Runtime counters.
///
/// # Endpoint
/// `GET /status`
pub async fn status(
    _req: Request<hyper::body::Incoming>,
    _params: MatchitParams<'_, '_>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let stats = state.stats.lock().clone();
    json_success(200, stats)
}
