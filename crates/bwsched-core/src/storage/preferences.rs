//! Read-only view of the preferences the scheduler consumes.

use std::sync::Arc;

use chrono::NaiveTime;

use super::config::Config;
use crate::schedule::{resolve_profile, AlternativeWindow, DaySelector, ScheduleEntry, SpeedProfile};

/// Read accessor injected into the scheduler.
///
/// Reads are synchronous and must reflect the latest committed edits.
/// Implementations that can be edited concurrently should override
/// [`snapshot`](Self::snapshot) so one evaluation sees a consistent view.
pub trait SchedulePreferences {
    fn scheduler_start_time(&self) -> NaiveTime;
    fn scheduler_end_time(&self) -> NaiveTime;
    fn scheduler_days(&self) -> DaySelector;
    /// Entries in evaluation order.
    fn schedule_entries(&self) -> Vec<ScheduleEntry>;
    fn default_speed_profile(&self) -> String;
    fn speed_profiles(&self) -> Vec<SpeedProfile>;

    fn find_speed_profile(&self, name: &str) -> Option<SpeedProfile> {
        self.speed_profiles().into_iter().find(|p| p.name == name)
    }

    /// Everything one scheduler evaluation needs.
    fn snapshot(&self) -> PreferencesSnapshot {
        PreferencesSnapshot {
            alternative_window: AlternativeWindow::new(
                self.scheduler_start_time(),
                self.scheduler_end_time(),
                self.scheduler_days(),
            ),
            entries: self.schedule_entries(),
            default_profile: self.default_speed_profile(),
            profiles: self.speed_profiles(),
        }
    }
}

/// Point-in-time copy of the scheduling preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesSnapshot {
    pub alternative_window: AlternativeWindow,
    pub entries: Vec<ScheduleEntry>,
    pub default_profile: String,
    pub profiles: Vec<SpeedProfile>,
}

impl PreferencesSnapshot {
    pub fn from_config(config: &Config) -> Self {
        Self {
            alternative_window: config.scheduler.alternative_window(),
            entries: config.entries.clone(),
            default_profile: config.default_profile.clone(),
            profiles: config.profiles.clone(),
        }
    }

    pub fn find_profile(&self, name: &str) -> Option<&SpeedProfile> {
        resolve_profile(name, &self.profiles)
    }
}

impl SchedulePreferences for Config {
    fn scheduler_start_time(&self) -> NaiveTime {
        self.scheduler.start_time
    }

    fn scheduler_end_time(&self) -> NaiveTime {
        self.scheduler.end_time
    }

    fn scheduler_days(&self) -> DaySelector {
        self.scheduler.days
    }

    fn schedule_entries(&self) -> Vec<ScheduleEntry> {
        self.entries.clone()
    }

    fn default_speed_profile(&self) -> String {
        self.default_profile.clone()
    }

    fn speed_profiles(&self) -> Vec<SpeedProfile> {
        self.profiles.clone()
    }

    fn find_speed_profile(&self, name: &str) -> Option<SpeedProfile> {
        self.find_profile(name).cloned()
    }

    fn snapshot(&self) -> PreferencesSnapshot {
        PreferencesSnapshot::from_config(self)
    }
}

impl<T: SchedulePreferences + ?Sized> SchedulePreferences for Arc<T> {
    fn scheduler_start_time(&self) -> NaiveTime {
        (**self).scheduler_start_time()
    }

    fn scheduler_end_time(&self) -> NaiveTime {
        (**self).scheduler_end_time()
    }

    fn scheduler_days(&self) -> DaySelector {
        (**self).scheduler_days()
    }

    fn schedule_entries(&self) -> Vec<ScheduleEntry> {
        (**self).schedule_entries()
    }

    fn default_speed_profile(&self) -> String {
        (**self).default_speed_profile()
    }

    fn speed_profiles(&self) -> Vec<SpeedProfile> {
        (**self).speed_profiles()
    }

    fn find_speed_profile(&self, name: &str) -> Option<SpeedProfile> {
        (**self).find_speed_profile(name)
    }

    fn snapshot(&self) -> PreferencesSnapshot {
        (**self).snapshot()
    }
}
