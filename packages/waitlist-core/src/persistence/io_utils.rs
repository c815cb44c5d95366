//! I/O utilities for snapshot persistence.

use std::io::ErrorKind;

use crate::error::RosterError;

/// Classifies write-side I/O errors into specific RosterError variants.
pub fn classify_write_error(error: std::io::Error, context: &str) -> RosterError {
    match error.kind() {
        ErrorKind::StorageFull | ErrorKind::OutOfMemory => {
            RosterError::DiskFull(format!("{}: {}", context, error))
        }
        _ => RosterError::PersistenceWrite(format!("{}: {}", context, error)),
    }
}

/// Classifies read-side I/O errors. Undecodable bytes count as corruption.
pub fn classify_read_error(error: std::io::Error, context: &str) -> RosterError {
    match error.kind() {
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
            RosterError::CorruptPersistedState(format!("{}: {}", context, error))
        }
        _ => RosterError::Io(format!("{}: {}", context, error)),
    }
}
