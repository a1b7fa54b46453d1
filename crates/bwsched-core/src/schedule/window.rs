//! Time-of-day window test shared by schedule entries.

use chrono::{NaiveTime, Timelike};

/// Truncate to the start of the minute. Used for stored bounds only.
pub fn clock_minute(t: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t)
}

/// Closed-interval window test with midnight wrap.
///
/// `start <= end`: `start <= now <= end`.
/// `start > end`: `now >= start || now <= end`.
///
/// `start == end` takes the first branch and matches only that instant.
pub fn in_window(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        start <= now && now <= end
    } else {
        now >= start || now <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn normal_window_is_inclusive() {
        assert!(in_window(t(8, 0), t(8, 0), t(18, 0)));
        assert!(in_window(t(18, 0), t(8, 0), t(18, 0)));
        assert!(in_window(t(12, 30), t(8, 0), t(18, 0)));
        assert!(!in_window(t(7, 59), t(8, 0), t(18, 0)));
        assert!(!in_window(t(18, 1), t(8, 0), t(18, 0)));
        assert!(!in_window(NaiveTime::from_hms_opt(18, 0, 45).unwrap(), t(8, 0), t(18, 0)));
    }

    #[test]
    fn wrapped_window() {
        for now in [t(23, 0), t(0, 0), t(1, 0), t(23, 59)] {
            assert!(in_window(now, t(23, 0), t(1, 0)), "{now}");
        }
        assert!(!in_window(t(12, 0), t(23, 0), t(1, 0)));
        assert!(!in_window(t(1, 1), t(23, 0), t(1, 0)));
        assert!(!in_window(t(22, 59), t(23, 0), t(1, 0)));
    }

    #[test]
    fn equal_bounds_match_one_instant() {
        assert!(in_window(t(5, 0), t(5, 0), t(5, 0)));
        assert!(!in_window(NaiveTime::from_hms_opt(5, 0, 1).unwrap(), t(5, 0), t(5, 0)));
        assert!(!in_window(t(5, 1), t(5, 0), t(5, 0)));
        assert!(!in_window(t(4, 59), t(5, 0), t(5, 0)));
    }

    #[test]
    fn clock_minute_drops_seconds() {
        let precise = NaiveTime::from_hms_milli_opt(9, 15, 42, 500).unwrap();
        assert_eq!(clock_minute(precise), t(9, 15));
    }
}
