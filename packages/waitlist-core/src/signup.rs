//! Self-registration intake.
//!
//! Nearby devices relay a signup as a flat string mapping. Missing or
//! malformed fields fall back to defaults instead of rejecting the signup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::guest::{Guest, Mood};
use crate::roster::RosterStore;
use crate::time_utils::DEFAULT_QUOTED_TIME;
use crate::Result;

/// Name used when a signup omits one.
pub const DEFAULT_SIGNUP_NAME: &str = "No Name";

/// Party size used when a signup omits one or sends something unusable.
pub const DEFAULT_PARTY_SIZE: u32 = 1;

/// Note attached to every self-registered guest.
pub const SIGNUP_NOTE: &str = "Added self to list";

/// A relayed self-registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signup {
    fields: HashMap<String, String>,
}

impl Signup {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Builds a signup from key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .map(String::as_str)
            .unwrap_or(DEFAULT_SIGNUP_NAME)
    }

    pub fn party_size(&self) -> u32 {
        self.fields
            .get("partySize")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_PARTY_SIZE)
    }

    /// Guest record for this signup, arriving at `now`.
    pub fn to_guest(&self, now: DateTime<Utc>) -> Guest {
        Guest::new(
            self.name(),
            self.party_size(),
            now,
            DEFAULT_QUOTED_TIME,
            Mood::Happy,
        )
        .with_notes(SIGNUP_NOTE)
    }
}

/// Adds a relayed signup to the roster.
///
/// # Returns
/// The new guest and the index it was inserted at.
pub fn register(
    store: &RosterStore,
    signup: &Signup,
    now: DateTime<Utc>,
) -> Result<(Guest, usize)> {
    let guest = signup.to_guest(now);
    if !signup.fields.contains_key("name") {
        tracing::warn!("Signup without a name, registering as '{}'", DEFAULT_SIGNUP_NAME);
    }
    let index = store.add_guest(guest.clone())?;
    Ok((guest, index))
}
