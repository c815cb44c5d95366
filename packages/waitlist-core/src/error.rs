//! Roster error types.

use thiserror::Error;

/// Roster operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Snapshot exists but cannot be decoded into a roster
    #[error("Corrupt persisted state: {0}")]
    CorruptPersistedState(String),

    /// Snapshot write failed
    #[error("Persistence write failed: {0}")]
    PersistenceWrite(String),

    /// Disk full error during persistence
    #[error("Disk full: {0}")]
    DiskFull(String),

    /// I/O error while reading persisted state
    #[error("I/O error: {0}")]
    Io(String),

    /// Lock poisoned (Mutex poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// No guest at the requested position
    #[error("No guest at position {index}")]
    GuestNotFound { index: usize },

    /// Guest addressed by record is no longer on the roster
    #[error("Guest '{name}' is no longer waiting")]
    GuestDeparted { name: String },

    /// Operation timeout
    #[error("Operation timeout")]
    Timeout,
}

impl RosterError {
    /// Returns true if the error leaves the in-memory roster usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterError::PersistenceWrite(_)
                | RosterError::DiskFull(_)
                | RosterError::GuestNotFound { .. }
                | RosterError::GuestDeparted { .. }
                | RosterError::Timeout
        )
    }
}
