//! Ordered guest roster and its shared store.

mod store;

pub use store::RosterStore;

use crate::guest::Guest;

/// Change notification published after a roster mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    /// A guest was inserted at `index`
    GuestAdded { guest: Guest, index: usize },
    /// A guest was removed from `index`
    GuestRemoved { guest: Guest, index: usize },
}

impl RosterEvent {
    /// Guest carried by the event.
    pub fn guest(&self) -> &Guest {
        match self {
            RosterEvent::GuestAdded { guest, .. } | RosterEvent::GuestRemoved { guest, .. } => {
                guest
            }
        }
    }

    /// Roster position carried by the event.
    pub fn index(&self) -> usize {
        match self {
            RosterEvent::GuestAdded { index, .. } | RosterEvent::GuestRemoved { index, .. } => {
                *index
            }
        }
    }
}

/// Ordered collection of waiting guests.
///
/// Holds the insertion policy only; locking, persistence and notification
/// live in [`RosterStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    guests: Vec<Guest>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps guests in their existing order.
    pub fn from_guests(guests: Vec<Guest>) -> Self {
        Self { guests }
    }

    /// Inserts `guest` and returns its index.
    ///
    /// The roster is first stable-sorted by arrival time, newest first, which
    /// discards any earlier manual ordering. If a structurally equal guest is
    /// already present the new one goes in at that position, ahead of the
    /// existing entry. Otherwise it goes after every guest who arrived at the
    /// same time or later, so the roster stays newest first.
    pub fn add_guest(&mut self, guest: Guest) -> usize {
        self.guests.sort_by(|a, b| b.arrival_time.cmp(&a.arrival_time));

        let index = self.position_of(&guest).unwrap_or_else(|| {
            self.guests.partition_point(|g| g.arrival_time >= guest.arrival_time)
        });
        self.guests.insert(index, guest);
        index
    }

    /// Removes the first guest equal to `guest`.
    ///
    /// # Returns
    /// The index the guest was removed from, or `None` if absent.
    pub fn remove_guest(&mut self, guest: &Guest) -> Option<usize> {
        let index = self.position_of(guest)?;
        self.guests.remove(index);
        Some(index)
    }

    /// Index of the first guest equal to `guest`.
    pub fn position_of(&self, guest: &Guest) -> Option<usize> {
        self.guests.iter().position(|g| g == guest)
    }

    pub fn get(&self, index: usize) -> Option<&Guest> {
        self.guests.get(index)
    }

    pub fn len(&self) -> usize {
        self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    pub fn as_slice(&self) -> &[Guest] {
        &self.guests
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Guest> {
        self.guests.iter()
    }
}
