//! Tick-based runtime that owns roster mutation order.
//!
//! Requests from the API arrive on a channel and are applied one at a time
//! on the runtime thread. Between requests the runtime refreshes the
//! countdown board on a fixed cadence.

mod handlers;
mod request;
mod runtime;

pub use handlers::{Clock, RequestHandlers};
pub use request::{ResponseSender, RosterRequest};
pub use runtime::{Runtime, RuntimeStats};

pub use waitlist_core::RosterError;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RosterError>;
