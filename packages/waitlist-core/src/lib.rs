//! Core roster engine for the restaurant wait list.
//!
//! Provides the guest record, the ordered roster with its insertion policy,
//! snapshot persistence, countdown projection, and signup intake.

pub mod config;
pub mod countdown;
pub mod error;
pub mod guest;
pub mod persistence;
pub mod roster;
pub mod signup;
pub mod time_utils;

pub use countdown::{Countdown, CountdownBoard, CountdownRow};
pub use error::RosterError;
pub use guest::{Guest, Mood};
pub use roster::{Roster, RosterEvent, RosterStore};

/// Result type for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
