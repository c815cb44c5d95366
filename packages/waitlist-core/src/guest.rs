//! Guest record and mood tag.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Qualitative status tag shown next to a waiting party.
///
/// Persisted as its ordinal. Decoding an ordinal outside the known range
/// yields [`Mood::Happy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Mood {
    #[default]
    Happy,
    Meh,
    Unhappy,
}

impl Mood {
    /// All moods in ordinal order.
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Meh, Mood::Unhappy];

    /// Ordinal used for persistence.
    pub fn ordinal(self) -> u8 {
        match self {
            Mood::Happy => 0,
            Mood::Meh => 1,
            Mood::Unhappy => 2,
        }
    }

    /// Display tint as an RGB hex string.
    pub fn tint(self) -> &'static str {
        match self {
            Mood::Happy => "#44A24E",
            Mood::Meh => "#E8BC25",
            Mood::Unhappy => "#B02521",
        }
    }

    /// Lowercase name, used by the API and the tool.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Meh => "meh",
            Mood::Unhappy => "unhappy",
        }
    }

    /// Parses a mood by name (case-insensitive) or by ordinal.
    pub fn parse(value: &str) -> Option<Mood> {
        let value = value.trim();
        if let Ok(ordinal) = value.parse::<u8>() {
            return Mood::ALL.get(ordinal as usize).copied();
        }
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(value))
    }
}

impl From<u8> for Mood {
    fn from(ordinal: u8) -> Self {
        match ordinal {
            1 => Mood::Meh,
            2 => Mood::Unhappy,
            _ => Mood::Happy,
        }
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.ordinal()
    }
}

/// One waiting party.
///
/// Equality is structural: two records are equal only if every field
/// matches, including the exact arrival instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub party_size: u32,
    pub arrival_time: DateTime<Utc>,
    /// Quoted wait in minutes, measured from `arrival_time`
    pub quoted_time: u32,
    pub mood: Mood,
    #[serde(default)]
    pub notes: String,
}

impl Guest {
    pub fn new(
        name: impl Into<String>,
        party_size: u32,
        arrival_time: DateTime<Utc>,
        quoted_time: u32,
        mood: Mood,
    ) -> Self {
        Self {
            name: name.into(),
            party_size,
            arrival_time,
            quoted_time,
            mood,
            notes: String::new(),
        }
    }

    /// Sets the free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// The moment the quoted wait runs out.
    pub fn quoted_moment(&self) -> DateTime<Utc> {
        self.arrival_time + Duration::minutes(i64::from(self.quoted_time))
    }
}
