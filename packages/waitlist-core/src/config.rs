//! Roster configuration.

use std::path::PathBuf;

/// Roster configuration.
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Data directory for the snapshot file
    pub data_dir: PathBuf,
    /// Snapshot file name inside `data_dir`
    pub snapshot_file: String,
    /// Runtime tick rate in Hz
    pub tickrate: u32,
    /// Countdown board refresh interval in milliseconds
    pub countdown_interval_ms: u64,
    /// Maximum runtime requests applied per tick
    pub max_requests_per_tick: u32,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Response timeout in milliseconds
    pub response_timeout_ms: u64,
    /// UTC offset used for arrival labels, in minutes
    pub display_utc_offset_minutes: i32,
}

impl RosterConfig {
    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            snapshot_file: "guests.json".to_string(),
            tickrate: 20,
            countdown_interval_ms: 5000,
            max_requests_per_tick: 200,
            request_timeout_ms: 5000,   // 5 seconds default
            response_timeout_ms: 10000, // 10 seconds default
            display_utc_offset_minutes: 0,
        }
    }
}
