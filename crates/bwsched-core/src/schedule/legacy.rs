//! Single-window "alternative speed limits" evaluation.
//!
//! Installations configured before named profiles existed have one window
//! and one boolean: inside the window (on a matching day) the alternative
//! limits apply. This signal is evaluated independently of the profile
//! resolver and the two are allowed to disagree.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::days::DaySelector;
use super::window::clock_minute;

/// The legacy alternative-limits window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub days: DaySelector,
}

impl AlternativeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, days: DaySelector) -> Self {
        Self { start, end, days }
    }

    /// Are the alternative limits requested at `now` on `iso_day`?
    ///
    /// A window whose start is after its end is normalized by swapping the
    /// bounds; the active period is then everything outside the swapped
    /// range. The day filter only gates the in-range flip, so on a
    /// non-matching day a wrapped window reports `true` all day.
    pub fn is_active(&self, now: NaiveTime, iso_day: u32) -> bool {
        let (mut start, mut end) = (clock_minute(self.start), clock_minute(self.end));
        let mut alternative = false;

        if start > end {
            std::mem::swap(&mut start, &mut end);
            alternative = true;
        }

        if start <= now && now <= end && self.days.matches(iso_day) {
            alternative = !alternative;
        }

        alternative
    }
}

impl Default for AlternativeWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN),
            days: DaySelector::EVERY_DAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn unwrapped_window() {
        let w = AlternativeWindow::new(t(8, 0), t(20, 0), DaySelector::EVERY_DAY);
        assert!(w.is_active(t(8, 0), 1));
        assert!(w.is_active(t(20, 0), 1));
        assert!(w.is_active(t(12, 0), 7));
        assert!(!w.is_active(t(7, 59), 1));
        assert!(!w.is_active(t(21, 0), 1));
    }

    #[test]
    fn end_bound_is_exact() {
        let w = AlternativeWindow::new(t(8, 0), t(20, 0), DaySelector::EVERY_DAY);
        assert!(w.is_active(t(20, 0), 1));
        assert!(!w.is_active(NaiveTime::from_hms_opt(20, 0, 30).unwrap(), 1));
        assert!(w.is_active(NaiveTime::from_hms_opt(19, 59, 59).unwrap(), 1));
    }

    #[test]
    fn unwrapped_window_day_filter() {
        let w = AlternativeWindow::new(t(8, 0), t(20, 0), DaySelector::WEEKDAY);
        assert!(w.is_active(t(12, 0), 5));
        assert!(!w.is_active(t(12, 0), 6));
    }

    #[test]
    fn wrapped_window_inverts() {
        // 22:00 -> 06:00 normalizes to [06:00, 22:00], active outside it.
        let w = AlternativeWindow::new(t(22, 0), t(6, 0), DaySelector::EVERY_DAY);
        assert!(w.is_active(t(23, 0), 3));
        assert!(w.is_active(t(3, 0), 3));
        assert!(!w.is_active(t(12, 0), 3));
        // Swapped bounds sit inside the normalized range, so they flip back.
        assert!(!w.is_active(t(22, 0), 3));
        assert!(!w.is_active(t(6, 0), 3));
    }

    #[test]
    fn wrapped_window_on_unmatched_day_stays_on() {
        let w = AlternativeWindow::new(t(22, 0), t(6, 0), DaySelector::Specific(Weekday::Mon));
        assert!(!w.is_active(t(12, 0), 1));
        assert!(w.is_active(t(12, 0), 2));
        assert!(w.is_active(t(23, 0), 2));
    }

    #[test]
    fn specific_day_uses_iso_index() {
        let w = AlternativeWindow::new(t(0, 0), t(23, 59), DaySelector::Specific(Weekday::Sun));
        for day in 1..=6 {
            assert!(!w.is_active(t(12, 0), day));
        }
        assert!(w.is_active(t(12, 0), 7));
    }

    #[test]
    fn default_window() {
        let w = AlternativeWindow::default();
        assert_eq!(w.start, t(8, 0));
        assert_eq!(w.end, t(20, 0));
        assert_eq!(w.days, DaySelector::EVERY_DAY);
    }
}
