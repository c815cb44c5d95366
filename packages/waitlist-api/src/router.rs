//! Matchit routing configuration.

use std::sync::Arc;

use chrono::FixedOffset;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use waitlist_core::config::RosterConfig;
use waitlist_core::time_utils::display_offset;
use waitlist_core::{CountdownBoard, RosterStore};
use waitlist_runtime::{RosterRequest, RuntimeStats};

use crate::handlers;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Roster store, read directly for listings
    pub store: Arc<RosterStore>,
    /// Roster configuration
    pub config: Arc<RosterConfig>,
    /// Request sender to runtime
    pub request_tx: mpsc::Sender<RosterRequest>,
    /// Countdown board published by the runtime
    pub board_rx: watch::Receiver<CountdownBoard>,
    /// Runtime counters
    pub stats: Arc<Mutex<RuntimeStats>>,
    /// Offset for arrival labels
    pub display_offset: FixedOffset,
}

impl AppState {
    pub fn new(
        store: Arc<RosterStore>,
        config: Arc<RosterConfig>,
        request_tx: mpsc::Sender<RosterRequest>,
        board_rx: watch::Receiver<CountdownBoard>,
        stats: Arc<Mutex<RuntimeStats>>,
    ) -> Self {
        let display_offset = display_offset(config.display_utc_offset_minutes);
        Self {
            store,
            config,
            request_tx,
            board_rx,
            stats,
            display_offset,
        }
    }
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the wait list routes.
    pub fn new(state: AppState) -> Result<Self, RouterError> {
        let mut router = MatchitRouter::new();

        let routes = [
            ("/guests", RouteHandler::Guests),
            ("/guests/{index}", RouteHandler::Guest),
            ("/guests/{index}/seat", RouteHandler::Seat),
            ("/signups", RouteHandler::Signups),
            ("/board", RouteHandler::Board),
            ("/quote-times", RouteHandler::QuoteTimes),
            ("/persist", RouteHandler::Persist),
            ("/status", RouteHandler::Status),
        ];
        for (path, handler) in routes {
            router.insert(path, handler).map_err(|e| {
                RouterError::InternalError(format!("Failed to insert {} route: {}", path, e))
            })?;
        }

        Ok(Self {
            inner: router,
            state,
        })
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// # Arguments
    /// * `req` - HTTP request
    ///
    /// # Returns
    /// `Result<Response<Bytes>, RouterError>` containing the response or an error.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let path = req.uri().path().to_string();

        match self.inner.at(&path) {
            Ok(matched) => {
                let result = matched
                    .value
                    .handle(req, matched.params, self.state.clone())
                    .await;
                // Handler failures become error envelopes with their status
                Ok(result.unwrap_or_else(Response::from))
            }
            Err(_) => Ok(RouterError::NotFound(format!("No route found for {}", path)).into()),
        }
    }
}

/// Route handler function.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Guests,
    Guest,
    Seat,
    Signups,
    Board,
    QuoteTimes,
    Persist,
    Status,
}

impl RouteHandler {
    /// Handles a request with the given route parameters.
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        params: matchit::Params<'_, '_>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        match (self, method) {
            (RouteHandler::Guests, Method::GET) => handlers::list_guests(req, params, state).await,
            (RouteHandler::Guests, Method::POST) => handlers::add_guest(req, params, state).await,
            (RouteHandler::Guest, Method::PUT) => handlers::edit_guest(req, params, state).await,
            (RouteHandler::Guest, Method::DELETE) => {
                handlers::remove_guest(req, params, state).await
            }
            (RouteHandler::Seat, Method::POST) => handlers::seat_guest(req, params, state).await,
            (RouteHandler::Signups, Method::POST) => handlers::signup(req, params, state).await,
            (RouteHandler::Board, Method::GET) => handlers::board(req, params, state).await,
            (RouteHandler::QuoteTimes, Method::GET) => {
                handlers::quote_times(req, params, state).await
            }
            (RouteHandler::Persist, Method::POST) => handlers::persist(req, params, state).await,
            (RouteHandler::Status, Method::GET) => handlers::status(req, params, state).await,
            _ => Err(RouterError::MethodNotAllowed),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::InternalError(_) => 500,
            RouterError::Timeout => 408,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed => "Method Not Allowed".to_string(),
            RouterError::Timeout => "Request Timeout".to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => msg.clone(),
        };
        if status >= 500 {
            tracing::error!("Request failed: {}", err);
        } else {
            tracing::debug!("Request rejected: {}", err);
        }

        let error_response = handlers::error_response(status, message, None);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}",
                e
            )
            .into_bytes()
        });

        let mut response = Response::new(Bytes::from(body));
        if let Ok(code) = hyper::StatusCode::from_u16(status) {
            *response.status_mut() = code;
        }
        if let Ok(value) = hyper::header::HeaderValue::from_str("application/json") {
            response
                .headers_mut()
                .insert(hyper::header::CONTENT_TYPE, value);
        }
        response
    }
}
