//! Persistence and restart recovery.

use std::fs;

use chrono::{Duration, TimeZone, Utc};
use ntest::timeout;
use tempfile::tempdir;

use waitlist_core::config::RosterConfig;
use waitlist_core::{Guest, Mood, RosterError, RosterStore};

fn config_for(dir: &std::path::Path) -> RosterConfig {
    RosterConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

/// A reopened store matches the one that wrote the snapshot.
#[timeout(2000)]
#[test]
fn test_restart_recovers_roster() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());
    let base = Utc.with_ymd_and_hms(2024, 6, 14, 17, 0, 0).unwrap();

    let written = {
        let store = RosterStore::open(&config).unwrap();
        assert!(store.is_empty());
        store
            .add_guest(
                Guest::new("Ola", 6, base + Duration::microseconds(1_500_001), 90, Mood::Meh)
                    .with_notes("birthday"),
            )
            .unwrap();
        store
            .add_guest(Guest::new("Pia", 2, base + Duration::minutes(4), 10, Mood::Unhappy))
            .unwrap();
        store
            .add_guest(Guest::new("Quin", 1, base - Duration::minutes(4), 5, Mood::Happy))
            .unwrap();
        store.guests()
    };

    let reopened = RosterStore::open(&config).unwrap();
    assert_eq!(*reopened.guests(), *written);
    assert_eq!(reopened.guest_at(1).unwrap().notes, "birthday");
    assert_eq!(reopened.guest_at(0).unwrap().mood, Mood::Unhappy);
}

/// Seating is visible after a restart; a bare remove is not.
#[timeout(2000)]
#[test]
fn test_seat_persists_but_bare_remove_does_not() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());
    let base = Utc.with_ymd_and_hms(2024, 6, 14, 17, 0, 0).unwrap();
    let a = Guest::new("A", 2, base, 10, Mood::Happy);
    let b = Guest::new("B", 2, base + Duration::minutes(1), 10, Mood::Happy);

    {
        let store = RosterStore::open(&config).unwrap();
        store.add_guest(a.clone()).unwrap();
        store.add_guest(b.clone()).unwrap();
        store.remove_guest(&a).unwrap();
    }
    assert_eq!(RosterStore::open(&config).unwrap().len(), 2);

    {
        let store = RosterStore::open(&config).unwrap();
        store.seat_guest(&a).unwrap();
    }
    assert_eq!(*RosterStore::open(&config).unwrap().guests(), vec![b]);
}

/// A corrupt snapshot refuses to open.
#[timeout(2000)]
#[test]
fn test_corrupt_snapshot_fails_open() {
    let temp_dir = tempdir().unwrap();
    let config = config_for(temp_dir.path());
    fs::write(config.snapshot_path(), br#"{"version":1,"guests":"#).unwrap();

    let err = RosterStore::open(&config).unwrap_err();
    assert!(matches!(err, RosterError::CorruptPersistedState(_)));
    assert!(!err.is_recoverable());
}
