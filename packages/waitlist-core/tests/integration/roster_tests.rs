//! Roster ordering and edit flows through the store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use ntest::timeout;
use tempfile::tempdir;

use waitlist_core::config::RosterConfig;
use waitlist_core::countdown::time_remaining_label;
use waitlist_core::time_utils::display_offset;
use waitlist_core::{Guest, Mood, RosterEvent, RosterStore};

fn opening() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 17, 0, 0).unwrap()
}

fn open_store(dir: &std::path::Path) -> RosterStore {
    let config = RosterConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    };
    RosterStore::open(&config).unwrap()
}

/// Arrivals in random order end up newest first after every add.
#[timeout(2000)]
#[test]
fn test_arrivals_sorted_newest_first() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    for (i, minute) in [12, 4, 30, 0, 18, 25, 7].into_iter().enumerate() {
        let guest = Guest::new(
            format!("party-{}", i),
            2,
            opening() + Duration::minutes(minute),
            10,
            Mood::Happy,
        );
        store.add_guest(guest).unwrap();

        let guests = store.guests();
        assert!(guests
            .windows(2)
            .all(|pair| pair[0].arrival_time > pair[1].arrival_time));
    }
    assert_eq!(store.len(), 7);
}

/// Edit flow: remove the original, add the edited copy.
#[timeout(2000)]
#[test]
fn test_edit_flow_keeps_single_entry() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    let original = Guest::new("Noor", 3, opening(), 20, Mood::Happy);
    store.add_guest(original.clone()).unwrap();
    store
        .add_guest(Guest::new("Theo", 2, opening() + Duration::minutes(3), 15, Mood::Meh))
        .unwrap();

    let edited = original.clone().with_notes("celebrating");
    store.remove_guest(&original).unwrap();
    let index = store.add_guest(edited.clone()).unwrap();

    assert_eq!(index, 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.guest_at(1).unwrap(), edited);
}

/// Re-adding an identical record sits beside the original.
#[timeout(2000)]
#[test]
fn test_identical_record_added_beside_original() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    let guest = Guest::new("Ines", 5, opening(), 45, Mood::Unhappy);
    store
        .add_guest(Guest::new("Abe", 1, opening() + Duration::minutes(9), 5, Mood::Happy))
        .unwrap();
    store.add_guest(guest.clone()).unwrap();

    let before = store.len();
    let index = store.add_guest(guest.clone()).unwrap();

    assert_eq!(index, 1);
    assert_eq!(store.len(), before + 1);
    assert_eq!(store.guest_at(1).unwrap(), guest);
    assert_eq!(store.guest_at(2).unwrap(), guest);
}

/// Observers see each add with its index.
#[timeout(2000)]
#[test]
fn test_observer_receives_added_guest_and_index() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());
    let events = store.subscribe().unwrap();

    let a = Guest::new("A", 2, opening(), 10, Mood::Happy);
    let b = Guest::new("B", 2, opening() + Duration::minutes(1), 10, Mood::Happy);
    store.add_guest(a.clone()).unwrap();
    store.add_guest(b.clone()).unwrap();

    let first = events.recv().unwrap();
    let second = events.recv().unwrap();
    assert_eq!(first, RosterEvent::GuestAdded { guest: a, index: 0 });
    assert_eq!(second.guest(), &b);
    assert_eq!(second.index(), 0);
}

/// Board labels agree with single-guest projection.
#[timeout(2000)]
#[test]
fn test_board_matches_projection() {
    let temp_dir = tempdir().unwrap();
    let store = open_store(temp_dir.path());

    store
        .add_guest(Guest::new("Early", 2, opening(), 5, Mood::Happy))
        .unwrap();
    store
        .add_guest(Guest::new("Late", 4, opening() + Duration::minutes(20), 60, Mood::Meh))
        .unwrap();

    let now = opening() + Duration::minutes(25);
    let board = store.board(now, display_offset(0));
    let guests = store.guests();

    assert_eq!(board.rows.len(), guests.len());
    for (row, guest) in board.rows.iter().zip(guests.iter()) {
        assert_eq!(row.name, guest.name);
        assert_eq!(row.remaining, time_remaining_label(guest, now));
    }
    assert_eq!(board.rows[0].remaining, "55 minutes");
    assert_eq!(board.rows[1].remaining, "20 minutes ago");
}
