//! Maps "current day + time" to the active speed profile name.
//!
//! Entries are evaluated in stored order. When several entries cover the
//! same instant the first one wins; that decision is made in exactly one
//! place, [`pick_winner`].

use chrono::{Datelike, NaiveDateTime, NaiveTime};

use super::entry::ScheduleEntry;
use super::profile::SpeedProfile;

/// Entry that decides the profile at `now` on `iso_day`, if any.
pub fn active_entry(now: NaiveTime, iso_day: u32, entries: &[ScheduleEntry]) -> Option<&ScheduleEntry> {
    pick_winner(entries.iter().filter(|entry| entry.is_active_at(now, iso_day)))
}

/// Name of the profile active at `now` on `iso_day`.
///
/// Falls back to `default_profile` when nothing matches. The default is
/// returned as given, even when empty or not naming a stored profile.
pub fn resolve<'a>(
    now: NaiveTime,
    iso_day: u32,
    entries: &'a [ScheduleEntry],
    default_profile: &'a str,
) -> &'a str {
    active_entry(now, iso_day, entries)
        .map(|entry| entry.profile_name.as_str())
        .unwrap_or(default_profile)
}

/// [`resolve`] for a local wall-clock timestamp.
pub fn resolve_at<'a>(
    at: NaiveDateTime,
    entries: &'a [ScheduleEntry],
    default_profile: &'a str,
) -> &'a str {
    resolve(at.time(), at.weekday().number_from_monday(), entries, default_profile)
}

/// Look up a resolved name among stored profiles.
///
/// `None` for dangling names.
pub fn resolve_profile<'a>(name: &str, profiles: &'a [SpeedProfile]) -> Option<&'a SpeedProfile> {
    profiles.iter().find(|p| p.name == name)
}

/// Conflict policy for overlapping entries: first in stored order.
fn pick_winner<'a>(mut candidates: impl Iterator<Item = &'a ScheduleEntry>) -> Option<&'a ScheduleEntry> {
    candidates.next()
}
