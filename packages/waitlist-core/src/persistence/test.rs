//! Tests for persistence module.

use std::fs;

use chrono::{Duration, TimeZone, Utc};
use ntest::timeout;
use tempfile::tempdir;

use crate::config::RosterConfig;
use crate::error::RosterError;
use crate::guest::{Guest, Mood};
use crate::persistence::{checksum, SnapshotFile, SnapshotManager};

fn sample_guests() -> Vec<Guest> {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
    vec![
        Guest::new("Grace", 3, base + Duration::nanoseconds(123_456_789), 20, Mood::Unhappy)
            .with_notes("high chair"),
        Guest::new("Alan", 2, base, 105, Mood::Meh),
    ]
}

#[timeout(1000)]
#[test]
fn test_persist_and_load_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config = RosterConfig {
        data_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    let snapshots = SnapshotManager::new(&config);

    let guests = sample_guests();
    snapshots.persist(&guests).unwrap();

    // Verify snapshot file exists and no temp file is left behind
    assert!(temp_dir.path().join("guests.json").exists());
    assert!(!temp_dir.path().join("guests.json.tmp").exists());

    let loaded = snapshots.load().unwrap();
    assert_eq!(loaded, guests);
    assert_eq!(loaded[0].arrival_time, guests[0].arrival_time);
    assert_eq!(loaded[0].mood, Mood::Unhappy);
}

#[timeout(1000)]
#[test]
fn test_load_missing_snapshot_is_empty() {
    let temp_dir = tempdir().unwrap();
    let snapshots = SnapshotManager::at_path(temp_dir.path().join("guests.json"));
    assert!(snapshots.load().unwrap().is_empty());
}

#[timeout(1000)]
#[test]
fn test_persist_creates_data_directory() {
    let temp_dir = tempdir().unwrap();
    let config = RosterConfig {
        data_dir: temp_dir.path().join("nested").join("data"),
        ..Default::default()
    };
    let snapshots = SnapshotManager::new(&config);
    snapshots.persist(&sample_guests()).unwrap();
    assert!(config.snapshot_path().exists());
}

#[timeout(1000)]
#[test]
fn test_persist_overwrites_previous_snapshot() {
    let temp_dir = tempdir().unwrap();
    let snapshots = SnapshotManager::at_path(temp_dir.path().join("guests.json"));

    let guests = sample_guests();
    snapshots.persist(&guests).unwrap();
    snapshots.persist(&guests[..1]).unwrap();

    assert_eq!(snapshots.load().unwrap(), guests[..1].to_vec());
}

#[timeout(1000)]
#[test]
fn test_malformed_snapshot_is_corrupt() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("guests.json");
    fs::write(&path, "{ not json").unwrap();

    let err = SnapshotManager::at_path(&path).load().unwrap_err();
    assert!(matches!(err, RosterError::CorruptPersistedState(_)));
}

#[timeout(1000)]
#[test]
fn test_checksum_mismatch_is_corrupt() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("guests.json");
    let snapshots = SnapshotManager::at_path(&path);
    snapshots.persist(&sample_guests()).unwrap();

    // Tamper with a guest without updating the checksum
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replace("Grace", "Gracie")).unwrap();

    let err = snapshots.load().unwrap_err();
    match err {
        RosterError::CorruptPersistedState(msg) => assert!(msg.contains("Checksum")),
        other => panic!("expected corruption, got {:?}", other),
    }
}

#[timeout(1000)]
#[test]
fn test_unsupported_version_is_corrupt() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("guests.json");

    let mut snapshot = SnapshotFile::new(&sample_guests()).unwrap();
    snapshot.version = 7;
    fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let err = SnapshotManager::at_path(&path).load().unwrap_err();
    assert!(matches!(err, RosterError::CorruptPersistedState(_)));
}

#[timeout(1000)]
#[test]
fn test_persist_into_file_path_fails_without_touching_snapshot() {
    let temp_dir = tempdir().unwrap();
    // Parent "directory" is a regular file, so the write cannot succeed
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let snapshots = SnapshotManager::at_path(blocker.join("guests.json"));

    let err = snapshots.persist(&sample_guests()).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}

#[timeout(1000)]
#[test]
fn test_checksum_covers_stored_bytes() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("guests.json");

    // Unknown mood ordinal and explicit offset both re-encode differently
    let guests = r#"[{"name":"Ada","party_size":2,"arrival_time":"2024-03-01T18:00:00+00:00","quoted_time":15,"mood":7,"notes":""}]"#;
    let contents = format!(
        r#"{{"version":1,"checksum":{},"guests":{}}}"#,
        checksum(guests.as_bytes()),
        guests
    );
    fs::write(&path, contents).unwrap();

    let loaded = SnapshotManager::at_path(&path).load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Ada");
    assert_eq!(loaded[0].mood, Mood::Happy);
    assert_eq!(
        loaded[0].arrival_time,
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    );
}

#[timeout(1000)]
#[test]
fn test_undecodable_guests_with_valid_checksum_is_corrupt() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("guests.json");

    let guests = r#"[{"name":"Ada"}]"#;
    let contents = format!(
        r#"{{"version":1,"checksum":{},"guests":{}}}"#,
        checksum(guests.as_bytes()),
        guests
    );
    fs::write(&path, contents).unwrap();

    let err = SnapshotManager::at_path(&path).load().unwrap_err();
    assert!(matches!(err, RosterError::CorruptPersistedState(_)));
}
