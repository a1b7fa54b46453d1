//! Day selectors for schedule entries and the legacy alternative-limits window.
//!
//! A selector is either a recurring pattern (every day, weekdays, weekend) or
//! one specific day of the week. Days are compared by ISO index,
//! 1 = Monday through 7 = Sunday.
//!
//! On disk a selector is an integer code:
//!
//! | code | selector  |
//! |------|-----------|
//! | 0    | EveryDay  |
//! | 1    | Weekday   |
//! | 2    | Weekend   |
//! | 3..9 | Monday..Sunday |

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Recurring day pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPattern {
    EveryDay,
    Weekday,
    Weekend,
}

/// Which days a window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaySelector {
    Pattern(DayPattern),
    Specific(Weekday),
}

/// Code persisted for a selector that could not be recognized on load.
pub const UNRECOGNIZED_DAY_CODE: i64 = -1;

const CODE_TABLE: [(i64, DaySelector); 10] = [
    (0, DaySelector::Pattern(DayPattern::EveryDay)),
    (1, DaySelector::Pattern(DayPattern::Weekday)),
    (2, DaySelector::Pattern(DayPattern::Weekend)),
    (3, DaySelector::Specific(Weekday::Mon)),
    (4, DaySelector::Specific(Weekday::Tue)),
    (5, DaySelector::Specific(Weekday::Wed)),
    (6, DaySelector::Specific(Weekday::Thu)),
    (7, DaySelector::Specific(Weekday::Fri)),
    (8, DaySelector::Specific(Weekday::Sat)),
    (9, DaySelector::Specific(Weekday::Sun)),
];

impl DaySelector {
    pub const EVERY_DAY: DaySelector = DaySelector::Pattern(DayPattern::EveryDay);
    pub const WEEKDAY: DaySelector = DaySelector::Pattern(DayPattern::Weekday);
    pub const WEEKEND: DaySelector = DaySelector::Pattern(DayPattern::Weekend);

    /// All ten selectors in code order.
    pub fn all() -> impl Iterator<Item = DaySelector> {
        CODE_TABLE.iter().map(|(_, sel)| *sel)
    }

    /// Does this selector cover the given ISO day (1 = Monday .. 7 = Sunday)?
    ///
    /// Days outside `1..=7` never match.
    pub fn matches(&self, iso_day: u32) -> bool {
        if !(1..=7).contains(&iso_day) {
            return false;
        }
        match self {
            DaySelector::Pattern(DayPattern::EveryDay) => true,
            DaySelector::Pattern(DayPattern::Weekday) => iso_day <= 5,
            DaySelector::Pattern(DayPattern::Weekend) => iso_day >= 6,
            DaySelector::Specific(day) => day.number_from_monday() == iso_day,
        }
    }

    pub fn code(&self) -> i64 {
        CODE_TABLE
            .iter()
            .find(|(_, sel)| sel == self)
            .map(|(code, _)| *code)
            .unwrap_or(UNRECOGNIZED_DAY_CODE)
    }

    pub fn from_code(code: i64) -> Option<Self> {
        CODE_TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, sel)| *sel)
    }
}

/// Matcher over a possibly-unrecognized selector.
///
/// An unrecognized selector is silently non-matching.
pub fn day_matches(selector: Option<DaySelector>, iso_day: u32) -> bool {
    selector.is_some_and(|sel| sel.matches(iso_day))
}

impl Default for DaySelector {
    fn default() -> Self {
        DaySelector::EVERY_DAY
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DaySelector::Pattern(DayPattern::EveryDay) => "every-day",
            DaySelector::Pattern(DayPattern::Weekday) => "weekday",
            DaySelector::Pattern(DayPattern::Weekend) => "weekend",
            DaySelector::Specific(Weekday::Mon) => "monday",
            DaySelector::Specific(Weekday::Tue) => "tuesday",
            DaySelector::Specific(Weekday::Wed) => "wednesday",
            DaySelector::Specific(Weekday::Thu) => "thursday",
            DaySelector::Specific(Weekday::Fri) => "friday",
            DaySelector::Specific(Weekday::Sat) => "saturday",
            DaySelector::Specific(Weekday::Sun) => "sunday",
        };
        f.write_str(label)
    }
}

impl FromStr for DaySelector {
    type Err = String;

    /// Accepts the display labels, `everyday`/`daily`, or any weekday name
    /// chrono understands ("mon", "Tuesday", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "every-day" | "everyday" | "daily" | "all" => Ok(DaySelector::EVERY_DAY),
            "weekday" | "weekdays" => Ok(DaySelector::WEEKDAY),
            "weekend" | "weekends" => Ok(DaySelector::WEEKEND),
            other => other
                .parse::<Weekday>()
                .map(DaySelector::Specific)
                .map_err(|_| format!("unknown day selector: {s}")),
        }
    }
}

impl Serialize for DaySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for DaySelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        DaySelector::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown day selector code {code}")))
    }
}

/// Serde adapter for `Option<DaySelector>` fields that must load even when
/// the stored code is unknown.
///
/// Unknown codes become `None` and are written back as
/// [`UNRECOGNIZED_DAY_CODE`].
pub mod lenient_code {
    use super::{DaySelector, UNRECOGNIZED_DAY_CODE};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DaySelector>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.map(|sel| sel.code()).unwrap_or(UNRECOGNIZED_DAY_CODE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DaySelector>, D::Error> {
        let code = i64::deserialize(deserializer)?;
        let selector = DaySelector::from_code(code);
        if selector.is_none() {
            tracing::warn!(code, "unrecognized day selector code, entry will never match");
        }
        Ok(selector)
    }

    pub fn default_every_day() -> Option<DaySelector> {
        Some(DaySelector::EVERY_DAY)
    }
}
