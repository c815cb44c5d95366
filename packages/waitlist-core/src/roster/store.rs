//! Shared roster store: one mutation lock, snapshot persistence, and
//! change notification.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use chrono::{DateTime, FixedOffset, Utc};

use crate::config::RosterConfig;
use crate::countdown::CountdownBoard;
use crate::error::RosterError;
use crate::guest::Guest;
use crate::persistence::SnapshotManager;
use crate::Result;

use super::{Roster, RosterEvent};

#[derive(Debug)]
struct StoreState {
    roster: Roster,
    subscribers: Vec<mpsc::Sender<RosterEvent>>,
    /// Error from the most recent snapshot write, cleared on success
    persist_failure: Option<RosterError>,
}

/// Canonical wait list for one process.
///
/// Every mutation runs under a single mutex so the find, splice and write
/// steps never interleave. Readers get an immutable copy of the roster
/// published after each mutation and never take the lock.
#[derive(Debug)]
pub struct RosterStore {
    state: Mutex<StoreState>,
    published: ArcSwap<Vec<Guest>>,
    snapshots: SnapshotManager,
}

impl RosterStore {
    /// Loads the roster from the configured snapshot.
    ///
    /// A missing snapshot yields an empty roster. A corrupt one is returned
    /// as `RosterError::CorruptPersistedState`.
    pub fn open(config: &RosterConfig) -> Result<Self> {
        let snapshots = SnapshotManager::new(config);
        let guests = snapshots.load()?;
        Ok(Self::with_guests(snapshots, guests))
    }

    /// Creates a store over already loaded guests.
    pub fn with_guests(snapshots: SnapshotManager, guests: Vec<Guest>) -> Self {
        let published = ArcSwap::from_pointee(guests.clone());
        Self {
            state: Mutex::new(StoreState {
                roster: Roster::from_guests(guests),
                subscribers: Vec::new(),
                persist_failure: None,
            }),
            published,
            snapshots,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| RosterError::LockPoisoned)
    }

    /// Adds a guest and persists the roster.
    ///
    /// # Returns
    /// The index the guest now occupies. A failed write is logged and does
    /// not fail the insertion.
    pub fn add_guest(&self, guest: Guest) -> Result<usize> {
        let mut state = self.lock()?;
        let index = self.add_locked(&mut state, guest);
        Ok(index)
    }

    /// Removes the first guest equal to `guest` without persisting.
    ///
    /// # Returns
    /// `true` if a guest was removed. Removing an absent guest is a no-op.
    pub fn remove_guest(&self, guest: &Guest) -> Result<bool> {
        let mut state = self.lock()?;
        Ok(self.remove_locked(&mut state, guest).is_some())
    }

    /// Writes the full roster to the snapshot.
    pub fn persist(&self) -> Result<()> {
        let mut state = self.lock()?;
        self.persist_locked(&mut state)
    }

    /// Error from the most recent snapshot write, if it failed.
    ///
    /// Mutations only log write failures. Callers that must report them
    /// check here after mutating instead of writing again.
    pub fn persist_failure(&self) -> Result<Option<RosterError>> {
        Ok(self.lock()?.persist_failure.clone())
    }

    /// Removes a guest who has been seated, then persists.
    pub fn seat_guest(&self, guest: &Guest) -> Result<bool> {
        self.depart(guest, "seated")
    }

    /// Removes a guest who left the list without being seated, then persists.
    pub fn dismiss_guest(&self, guest: &Guest) -> Result<bool> {
        self.depart(guest, "removed")
    }

    fn depart(&self, guest: &Guest, reason: &str) -> Result<bool> {
        let mut state = self.lock()?;
        let removed = self.remove_locked(&mut state, guest);
        if let Some(index) = removed {
            tracing::info!("Guest '{}' {} from position {}", guest.name, reason, index);
            // Failure is already logged; memory stays authoritative
            let _ = self.persist_locked(&mut state);
        }
        Ok(removed.is_some())
    }

    /// Swaps `original` for `updated` as one step.
    ///
    /// `original` is removed and `updated` is added with the usual ordering
    /// policy.
    ///
    /// # Returns
    /// The index `updated` now occupies, or `RosterError::GuestDeparted`
    /// with the roster untouched when `original` is no longer present.
    pub fn replace_guest(&self, original: &Guest, updated: Guest) -> Result<usize> {
        let mut state = self.lock()?;
        if self.remove_locked(&mut state, original).is_none() {
            tracing::warn!("Edit of '{}' ignored, guest already left", original.name);
            return Err(RosterError::GuestDeparted {
                name: original.name.clone(),
            });
        }
        Ok(self.add_locked(&mut state, updated))
    }

    /// Current roster, safe to hold across later mutations.
    pub fn guests(&self) -> Arc<Vec<Guest>> {
        self.published.load_full()
    }

    /// Guest at `index` in the current roster.
    pub fn guest_at(&self, index: usize) -> Result<Guest> {
        self.published
            .load()
            .get(index)
            .cloned()
            .ok_or(RosterError::GuestNotFound { index })
    }

    pub fn len(&self) -> usize {
        self.published.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.load().is_empty()
    }

    /// Countdown board for the current roster.
    pub fn board(&self, now: DateTime<Utc>, offset: FixedOffset) -> CountdownBoard {
        CountdownBoard::project(&self.published.load(), now, offset)
    }

    /// Registers a listener for roster changes.
    ///
    /// Listeners whose receiver has been dropped are pruned on the next
    /// event.
    pub fn subscribe(&self) -> Result<mpsc::Receiver<RosterEvent>> {
        let (tx, rx) = mpsc::channel();
        self.lock()?.subscribers.push(tx);
        Ok(rx)
    }

    /// Snapshot manager backing this store.
    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    fn add_locked(&self, state: &mut StoreState, guest: Guest) -> usize {
        let index = state.roster.add_guest(guest.clone());
        tracing::info!(
            "Guest '{}' (party of {}) added at position {}",
            guest.name,
            guest.party_size,
            index
        );
        self.publish(state);
        // Failure is already logged; memory stays authoritative
        let _ = self.persist_locked(state);
        Self::notify(state, RosterEvent::GuestAdded { guest, index });
        index
    }

    fn remove_locked(&self, state: &mut StoreState, guest: &Guest) -> Option<usize> {
        let index = state.roster.remove_guest(guest)?;
        self.publish(state);
        Self::notify(
            state,
            RosterEvent::GuestRemoved {
                guest: guest.clone(),
                index,
            },
        );
        Some(index)
    }

    fn persist_locked(&self, state: &mut StoreState) -> Result<()> {
        let result = self.snapshots.persist(state.roster.as_slice());
        state.persist_failure = result.as_ref().err().cloned();
        match result {
            Ok(()) => {
                tracing::debug!(
                    "Persisted {} guests to {}",
                    state.roster.len(),
                    self.snapshots.path().display()
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Could not persist guest data: {}", e);
                Err(e)
            }
        }
    }

    fn publish(&self, state: &StoreState) {
        self.published.store(Arc::new(state.roster.as_slice().to_vec()));
    }

    fn notify(state: &mut StoreState, event: RosterEvent) {
        state
            .subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}
