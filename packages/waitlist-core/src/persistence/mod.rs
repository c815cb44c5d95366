//! Roster snapshot persistence and recovery.
//!
//! The whole roster is written as one JSON document. Writes go to a
//! temporary file that is synced and then renamed over the snapshot, so a
//! failed write leaves the previous snapshot intact.

#[cfg(test)]
mod test;

pub mod io_utils;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::guest::Guest;

use io_utils::{classify_read_error, classify_write_error};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot file format for persistence.
///
/// `guests` is kept as the exact bytes found on disk so the checksum is
/// verified against what was written, not against a re-encoding.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Snapshot version
    pub version: u32,
    /// CRC32 of the stored `guests` JSON text
    pub checksum: u32,
    /// Guests in roster order, undecoded
    pub guests: Box<RawValue>,
}

impl SnapshotFile {
    /// Builds a snapshot of `guests` with a fresh checksum.
    pub fn new(guests: &[Guest]) -> Result<Self, RosterError> {
        let encoded = serde_json::to_string(guests)
            .map_err(|e| RosterError::PersistenceWrite(format!("Failed to encode guests: {}", e)))?;
        let guests = RawValue::from_string(encoded)
            .map_err(|e| RosterError::PersistenceWrite(format!("Failed to encode guests: {}", e)))?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            checksum: checksum(guests.get().as_bytes()),
            guests,
        })
    }

    /// Checks version and checksum.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(RosterError::CorruptPersistedState(format!(
                "Unsupported snapshot version: {}",
                self.version
            )));
        }
        let actual = checksum(self.guests.get().as_bytes());
        if actual != self.checksum {
            return Err(RosterError::CorruptPersistedState(format!(
                "Checksum mismatch: expected {:08x}, got {:08x}",
                self.checksum, actual
            )));
        }
        Ok(())
    }

    /// Decodes the stored guests.
    pub fn decode_guests(&self) -> Result<Vec<Guest>, RosterError> {
        serde_json::from_str(self.guests.get()).map_err(|e| {
            RosterError::CorruptPersistedState(format!("Failed to decode guests: {}", e))
        })
    }
}

/// CRC32 used for snapshot checksums.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Reads and writes the roster snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    /// Snapshot file path
    path: PathBuf,
}

impl SnapshotManager {
    /// Creates a snapshot manager for the configured data directory.
    pub fn new(config: &RosterConfig) -> Self {
        Self::at_path(config.snapshot_path())
    }

    /// Creates a snapshot manager for an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Loads the persisted roster.
    ///
    /// # Returns
    /// The guests in stored order, or an empty list when no snapshot exists.
    /// A snapshot that exists but cannot be decoded is
    /// `RosterError::CorruptPersistedState`.
    pub fn load(&self) -> Result<Vec<Guest>, RosterError> {
        if !self.path.exists() {
            tracing::info!("No snapshot at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut file =
            File::open(&self.path).map_err(|e| classify_read_error(e, "Failed to open snapshot"))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| classify_read_error(e, "Failed to read snapshot"))?;

        let snapshot: SnapshotFile = serde_json::from_str(&contents).map_err(|e| {
            RosterError::CorruptPersistedState(format!("Failed to parse snapshot: {}", e))
        })?;
        snapshot.validate()?;
        let guests = snapshot.decode_guests()?;

        tracing::info!("Loaded {} guests from {}", guests.len(), self.path.display());
        Ok(guests)
    }

    /// Writes the full roster, replacing the previous snapshot atomically.
    pub fn persist(&self, guests: &[Guest]) -> Result<(), RosterError> {
        let snapshot = SnapshotFile::new(guests)?;
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| RosterError::PersistenceWrite(format!("Failed to encode snapshot: {}", e)))?;

        // Ensure data directory exists
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .map_err(|e| classify_write_error(e, "Failed to create data directory"))?;
            }
        }

        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)
            .map_err(|e| classify_write_error(e, "Failed to create temp file"))?;
        file.write_all(json.as_bytes())
            .map_err(|e| classify_write_error(e, "Failed to write snapshot"))?;
        file.sync_all()
            .map_err(|e| classify_write_error(e, "Failed to sync snapshot"))?;
        drop(file);

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(classify_write_error(e, "Failed to rename snapshot"));
        }

        Ok(())
    }
}
