//! Request handlers applied on the runtime thread.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use waitlist_core::signup;
use waitlist_core::RosterStore;

use crate::request::RosterRequest;

/// Wall-clock source used for signup arrival times.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Applies roster requests against the store.
pub struct RequestHandlers {
    /// Roster store
    store: Arc<RosterStore>,
    /// Clock for arrival times
    clock: Clock,
}

impl RequestHandlers {
    /// Create new request handlers using the system clock
    pub fn new(store: Arc<RosterStore>) -> Self {
        Self {
            store,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    /// Current time according to the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Handle a roster request
    pub fn handle_request(&self, req: RosterRequest) {
        match req {
            RosterRequest::AddGuest { guest, response } => {
                let result = self
                    .store
                    .add_guest(guest.clone())
                    .map(|index| json!({ "index": index, "guest": guest }));
                let _ = response.send(result);
            }
            RosterRequest::ReplaceGuest {
                original,
                updated,
                response,
            } => {
                tracing::info!("Replacing guest '{}'", original.name);
                let result = self
                    .store
                    .replace_guest(&original, updated.clone())
                    .map(|index| json!({ "index": index, "guest": updated }));
                let _ = response.send(result);
            }
            RosterRequest::SeatGuest { guest, response } => {
                let result = self
                    .store
                    .seat_guest(&guest)
                    .map(|removed| json!({ "removed": removed }));
                let _ = response.send(result);
            }
            RosterRequest::RemoveGuest { guest, response } => {
                let result = self
                    .store
                    .dismiss_guest(&guest)
                    .map(|removed| json!({ "removed": removed }));
                let _ = response.send(result);
            }
            RosterRequest::Signup { signup: form, response } => {
                tracing::info!("Received signup for '{}'", form.name());
                let result = signup::register(&self.store, &form, self.now())
                    .map(|(guest, index)| json!({ "index": index, "guest": guest }));
                let _ = response.send(result);
            }
            RosterRequest::Persist { response } => {
                let result = self
                    .store
                    .persist()
                    .map(|()| json!({ "persisted": self.store.len() }));
                let _ = response.send(result);
            }
        }
    }
}
