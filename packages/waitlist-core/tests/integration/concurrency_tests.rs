//! Concurrent mutation through one store.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, TimeZone, Utc};
use ntest::timeout;
use tempfile::tempdir;

use waitlist_core::config::RosterConfig;
use waitlist_core::{Guest, Mood, RosterStore};

/// Parallel adds are serialized: nothing lost, order intact, snapshot complete.
#[timeout(10000)]
#[test]
fn test_parallel_adds_are_serialized() {
    let temp_dir = tempdir().unwrap();
    let config = RosterConfig {
        data_dir: temp_dir.path().to_path_buf(),
        ..Default::default()
    };
    let store = Arc::new(RosterStore::open(&config).unwrap());
    let base = Utc.with_ymd_and_hms(2024, 6, 14, 17, 0, 0).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    let minute = i64::from(worker * 10 + i);
                    let guest = Guest::new(
                        format!("w{}-{}", worker, i),
                        2,
                        base + Duration::minutes(minute),
                        15,
                        Mood::Happy,
                    );
                    store.add_guest(guest).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let guests = store.guests();
    assert_eq!(guests.len(), 40);
    assert!(guests
        .windows(2)
        .all(|pair| pair[0].arrival_time > pair[1].arrival_time));

    let reopened = RosterStore::open(&config).unwrap();
    assert_eq!(*reopened.guests(), *guests);
}
