use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::days::{day_matches, lenient_code, DaySelector};
use super::window::{clock_minute, in_window};

/// A recurring day/time window bound to a speed profile by name.
///
/// Times are `None` when missing or malformed on load; such an entry fails
/// [`is_valid`](Self::is_valid) and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(rename = "start", with = "hhmm", default)]
    pub start_time: Option<NaiveTime>,
    #[serde(rename = "end", with = "hhmm", default)]
    pub end_time: Option<NaiveTime>,
    #[serde(with = "lenient_code", default = "lenient_code::default_every_day")]
    pub days: Option<DaySelector>,
    #[serde(rename = "profile", default)]
    pub profile_name: String,
}

impl ScheduleEntry {
    pub fn new(
        start_time: NaiveTime,
        end_time: NaiveTime,
        days: DaySelector,
        profile_name: impl Into<String>,
    ) -> Self {
        Self {
            start_time: Some(clock_minute(start_time)),
            end_time: Some(clock_minute(end_time)),
            days: Some(days),
            profile_name: profile_name.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some() && !self.profile_name.is_empty()
    }

    /// Window crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        matches!((self.start_time, self.end_time), (Some(s), Some(e)) if s > e)
    }

    /// Does this entry cover `now` on `iso_day`?
    ///
    /// Malformed times and unrecognized day selectors never match.
    pub fn is_active_at(&self, now: NaiveTime, iso_day: u32) -> bool {
        if !day_matches(self.days, iso_day) {
            return false;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => in_window(now, start, end),
            _ => false,
        }
    }
}

/// `"HH:MM"` serde adapter for optional times.
///
/// Unparseable strings load as `None` instead of failing the whole file.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    /// Parse `HH:MM` (seconds tolerated and dropped).
    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
            .map(super::clock_minute)
    }
}
