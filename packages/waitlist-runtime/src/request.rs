//! Requests accepted by the runtime.

use tokio::sync::oneshot;
use waitlist_core::signup::Signup;
use waitlist_core::Guest;

use crate::Result;

/// Response sender for runtime requests
pub type ResponseSender = oneshot::Sender<Result<serde_json::Value>>;

/// Roster mutation requested by the API or another collaborator.
#[derive(Debug)]
pub enum RosterRequest {
    /// Add a guest
    AddGuest {
        guest: Guest,
        response: ResponseSender,
    },
    /// Replace a guest with an edited copy
    ReplaceGuest {
        original: Guest,
        updated: Guest,
        response: ResponseSender,
    },
    /// Seat a guest and persist
    SeatGuest {
        guest: Guest,
        response: ResponseSender,
    },
    /// Remove a guest without seating and persist
    RemoveGuest {
        guest: Guest,
        response: ResponseSender,
    },
    /// Register a relayed self-signup
    Signup {
        signup: Signup,
        response: ResponseSender,
    },
    /// Force a full snapshot write
    Persist { response: ResponseSender },
}

impl RosterRequest {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RosterRequest::AddGuest { .. } => "add_guest",
            RosterRequest::ReplaceGuest { .. } => "replace_guest",
            RosterRequest::SeatGuest { .. } => "seat_guest",
            RosterRequest::RemoveGuest { .. } => "remove_guest",
            RosterRequest::Signup { .. } => "signup",
            RosterRequest::Persist { .. } => "persist",
        }
    }

    /// Answers the request without applying it.
    pub fn reject(self, error: crate::RosterError) {
        let response = match self {
            RosterRequest::AddGuest { response, .. }
            | RosterRequest::ReplaceGuest { response, .. }
            | RosterRequest::SeatGuest { response, .. }
            | RosterRequest::RemoveGuest { response, .. }
            | RosterRequest::Signup { response, .. }
            | RosterRequest::Persist { response } => response,
        };
        let _ = response.send(Err(error));
    }
}
