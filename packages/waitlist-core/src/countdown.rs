//! Live "time remaining" projection for waiting guests.
//!
//! Everything here is a pure function of the guests and the supplied clock
//! reading. Callers decide how often to recompute.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::guest::{Guest, Mood};
use crate::time_utils::{arrival_label, minutes_until, spoken_duration};

/// Time left until (or since) a guest's quoted moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// More than 59 minutes past the quote
    OverAnHourAgo,
    /// 1 to 59 minutes past the quote
    MinutesAgo(u32),
    /// Within the current minute
    Now,
    /// 1 to 59 minutes left
    Minutes(u32),
    /// More than 59 minutes left
    OverAnHour,
}

impl Countdown {
    /// Classifies a signed minute delta.
    pub fn from_delta(delta_minutes: i64) -> Self {
        match delta_minutes {
            d if d < -59 => Countdown::OverAnHourAgo,
            d if d < 0 => Countdown::MinutesAgo(d.unsigned_abs() as u32),
            0 => Countdown::Now,
            d if d <= 59 => Countdown::Minutes(d as u32),
            _ => Countdown::OverAnHour,
        }
    }

    /// Projects `guest` at `now`.
    pub fn for_guest(guest: &Guest, now: DateTime<Utc>) -> Self {
        Self::from_delta(minutes_until(now, guest.quoted_moment()))
    }

    /// True once the quoted moment has passed.
    pub fn is_overdue(self) -> bool {
        matches!(self, Countdown::OverAnHourAgo | Countdown::MinutesAgo(_))
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::OverAnHourAgo => write!(f, "Over an hour ago"),
            Countdown::MinutesAgo(1) => write!(f, "1 minute ago"),
            Countdown::MinutesAgo(n) => write!(f, "{} minutes ago", n),
            Countdown::Now => write!(f, "Now!"),
            Countdown::Minutes(1) => write!(f, "1 minute"),
            Countdown::Minutes(n) => write!(f, "{} minutes", n),
            Countdown::OverAnHour => write!(f, "Over an hour"),
        }
    }
}

/// Countdown label for `guest` at `now`.
pub fn time_remaining_label(guest: &Guest, now: DateTime<Utc>) -> String {
    Countdown::for_guest(guest, now).to_string()
}

/// One displayed row of the wait list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownRow {
    /// Zero-based roster position
    pub index: usize,
    /// One-based number shown to staff
    pub number: usize,
    pub name: String,
    pub party_size: u32,
    pub arrival: String,
    pub quoted: String,
    pub remaining: String,
    pub overdue: bool,
    pub mood: Mood,
    pub tint: &'static str,
    pub notes: String,
}

/// Countdown rows for a whole roster at one clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownBoard {
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<CountdownRow>,
}

impl CountdownBoard {
    /// Projects every guest in roster order.
    pub fn project(guests: &[Guest], now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let rows = guests
            .iter()
            .enumerate()
            .map(|(index, guest)| {
                let countdown = Countdown::for_guest(guest, now);
                CountdownRow {
                    index,
                    number: index + 1,
                    name: guest.name.clone(),
                    party_size: guest.party_size,
                    arrival: arrival_label(guest.arrival_time, offset),
                    quoted: spoken_duration(guest.quoted_time),
                    remaining: countdown.to_string(),
                    overdue: countdown.is_overdue(),
                    mood: guest.mood,
                    tint: guest.mood.tint(),
                    notes: guest.notes.clone(),
                }
            })
            .collect();

        Self {
            generated_at: now,
            rows,
        }
    }

    /// An empty board.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::display_offset;
    use chrono::{Duration, TimeZone};

    fn arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    fn guest(quoted: u32) -> Guest {
        Guest::new("Lin", 2, arrival(), quoted, Mood::Happy)
    }

    #[test]
    fn label_table() {
        let cases = [
            (-120, "Over an hour ago"),
            (-60, "Over an hour ago"),
            (-59, "59 minutes ago"),
            (-2, "2 minutes ago"),
            (-1, "1 minute ago"),
            (0, "Now!"),
            (1, "1 minute"),
            (2, "2 minutes"),
            (59, "59 minutes"),
            (60, "Over an hour"),
        ];
        for (delta, expected) in cases {
            assert_eq!(Countdown::from_delta(delta).to_string(), expected, "delta {}", delta);
        }
    }

    #[test]
    fn quoted_five_minutes_scenario() {
        let g = guest(5);
        let at = |minutes: i64| arrival() + Duration::minutes(minutes);
        assert_eq!(time_remaining_label(&g, at(5)), "Now!");
        assert_eq!(time_remaining_label(&g, at(4)), "1 minute");
        assert_eq!(time_remaining_label(&g, at(7)), "2 minutes ago");
        assert_eq!(time_remaining_label(&g, at(125)), "Over an hour ago");
    }

    #[test]
    fn partial_minutes_round_toward_zero() {
        let g = guest(5);
        let now = arrival() + Duration::minutes(5) + Duration::seconds(30);
        assert_eq!(time_remaining_label(&g, now), "Now!");
        let now = arrival() + Duration::minutes(2) + Duration::seconds(10);
        assert_eq!(time_remaining_label(&g, now), "2 minutes");
    }

    #[test]
    fn projection_is_repeatable() {
        let g = guest(30);
        let now = arrival() + Duration::seconds(421);
        assert_eq!(time_remaining_label(&g, now), time_remaining_label(&g, now));
    }

    #[test]
    fn board_rows_follow_roster_order() {
        let guests = vec![guest(90), guest(5).with_notes("booth")];
        let now = arrival() + Duration::minutes(10);
        let board = CountdownBoard::project(&guests, now, display_offset(0));

        assert_eq!(board.rows.len(), 2);
        assert_eq!(board.rows[0].number, 1);
        assert_eq!(board.rows[0].remaining, "Over an hour");
        assert_eq!(board.rows[0].quoted, "1 hour 30 minutes");
        assert!(!board.rows[0].overdue);
        assert_eq!(board.rows[1].remaining, "5 minutes ago");
        assert!(board.rows[1].overdue);
        assert_eq!(board.rows[1].arrival, "06:00 PM");
        assert_eq!(board.rows[1].notes, "booth");
    }
}
