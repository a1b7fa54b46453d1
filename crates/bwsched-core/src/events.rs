use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Announcements produced by the scheduler.
///
/// The two kinds are separate signals: each is emitted once at start and
/// afterwards only when its own value changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Legacy single-window signal: alternative limits on or off.
    AlternativeLimitsRequested {
        active: bool,
        at: NaiveDateTime,
    },
    /// Named speed profile that should now be applied.
    SpeedProfileRequested {
        profile: String,
        at: NaiveDateTime,
    },
}

impl Event {
    pub fn at(&self) -> NaiveDateTime {
        match self {
            Event::AlternativeLimitsRequested { at, .. } | Event::SpeedProfileRequested { at, .. } => *at,
        }
    }

    pub fn alternative_limits(&self) -> Option<bool> {
        match self {
            Event::AlternativeLimitsRequested { active, .. } => Some(*active),
            _ => None,
        }
    }

    pub fn speed_profile(&self) -> Option<&str> {
        match self {
            Event::SpeedProfileRequested { profile, .. } => Some(profile),
            _ => None,
        }
    }
}
