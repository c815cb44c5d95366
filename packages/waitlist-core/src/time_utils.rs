//! Duration and clock helpers used for display.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Quote choices offered to staff, in minutes.
pub const QUOTE_TIMES: [u32; 14] = [5, 10, 15, 20, 25, 30, 35, 40, 45, 60, 75, 90, 105, 120];

/// Quoted wait assigned to self-registered guests, in minutes.
pub const DEFAULT_QUOTED_TIME: u32 = 5;

/// Formats a wait in minutes as spoken text.
///
/// Anything at or above two hours reads as "2 hours".
pub fn spoken_duration(minutes: u32) -> String {
    if minutes < 60 {
        format!("{} minutes", minutes)
    } else if minutes < 120 {
        format!("1 hour {} minutes", minutes % 60)
    } else {
        "2 hours".to_string()
    }
}

/// Signed whole minutes from `now` until `target`.
///
/// Positive when `target` is still ahead. Leftover seconds are dropped
/// toward zero, so 90 seconds either side of `target` is 1 or -1.
pub fn minutes_until(now: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    (target - now).num_minutes()
}

/// Quote choices paired with their spoken form.
pub fn quote_time_choices() -> Vec<(u32, String)> {
    QUOTE_TIMES
        .iter()
        .map(|&minutes| (minutes, spoken_duration(minutes)))
        .collect()
}

/// Position of `minutes` in [`QUOTE_TIMES`], or the first choice.
pub fn quote_time_index(minutes: u32) -> usize {
    QUOTE_TIMES
        .iter()
        .position(|&choice| choice == minutes)
        .unwrap_or(0)
}

/// Arrival time as `hh:mm AM` in the given offset.
pub fn arrival_label(time: DateTime<Utc>, offset: FixedOffset) -> String {
    time.with_timezone(&offset).format("%I:%M %p").to_string()
}

/// Builds a fixed offset from minutes east of UTC, falling back to UTC.
pub fn display_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| {
        tracing::warn!("Invalid display offset {} minutes, using UTC", minutes);
        Utc.fix()
    })
}
