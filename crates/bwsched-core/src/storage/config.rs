//! TOML-based preferences store.
//!
//! Holds everything the scheduler reads:
//! - Speed profiles and the default profile name
//! - Schedule entries, in evaluation order
//! - The legacy alternative-limits window
//! - The scheduler tick period
//!
//! Stored at `~/.config/bwsched/config.toml` unless `BWSCHED_CONFIG` points
//! elsewhere. The editing methods here are the validation boundary: the
//! scheduler itself trusts whatever is stored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::config_path;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::schedule::{AlternativeWindow, DaySelector, ScheduleEntry, SpeedProfile};

/// Default scheduler period. Coarse on purpose: re-checks only need to catch
/// wall-clock jumps, not second-level precision.
pub const DEFAULT_TICK_SECS: u64 = 30;

/// Scheduler loop and legacy window settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    #[serde(default = "default_start_time", with = "hhmm_strict")]
    pub start_time: NaiveTime,
    #[serde(default = "default_end_time", with = "hhmm_strict")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub days: DaySelector,
}

/// Application configuration.
///
/// Serialized to/from TOML. Field order matters for TOML output: plain
/// values before tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Profile used when no entry matches.
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default = "default_profiles")]
    pub profiles: Vec<SpeedProfile>,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}
fn default_start_time() -> NaiveTime {
    AlternativeWindow::default().start
}
fn default_end_time() -> NaiveTime {
    AlternativeWindow::default().end
}
fn default_profile_name() -> String {
    "Normal".into()
}
fn default_profiles() -> Vec<SpeedProfile> {
    vec![SpeedProfile::unlimited(default_profile_name())]
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_tick_secs(),
            start_time: default_start_time(),
            end_time: default_end_time(),
            days: DaySelector::default(),
        }
    }
}

impl SchedulerConfig {
    /// Tick period, never below one second.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.tick_secs.max(1))
    }

    pub fn alternative_window(&self) -> AlternativeWindow {
        AlternativeWindow::new(self.start_time, self.end_time, self.days)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            scheduler: SchedulerConfig::default(),
            profiles: default_profiles(),
            entries: Vec::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || CoreError::from(ConfigError::UnknownKey(key.to_string()));
        let invalid = |message: String| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            })
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<i64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Load from the default location, or create it with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| {
            ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: PathBuf::from(path),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse
    /// into the field's type. `profiles` and `entries` are refused, and
    /// `default_profile` must name an existing profile, so this never
    /// stores what the editing methods would reject.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let section = key.split('.').next().unwrap_or_default();
        if matches!(section, "profiles" | "entries") {
            return Err(ConfigError::ManagedKey(key.to_string()).into());
        }
        if key == "default_profile" {
            self.set_default_profile(value)?;
            return Ok(());
        }

        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    // ── Profiles ─────────────────────────────────────────────────────

    pub fn find_profile(&self, name: &str) -> Option<&SpeedProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    fn profile_references(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.profile_name == name).count()
    }

    /// Add a new profile. Names are trimmed and must be unique.
    pub fn add_profile(&mut self, profile: SpeedProfile) -> Result<(), ValidationError> {
        let profile = validate_profile(profile)?;
        if self.find_profile(&profile.name).is_some() {
            return Err(ValidationError::DuplicateProfile(profile.name));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Replace the profile called `original_name`.
    ///
    /// Renaming re-points entries and the default profile at the new name.
    pub fn update_profile(
        &mut self,
        original_name: &str,
        profile: SpeedProfile,
    ) -> Result<(), ValidationError> {
        let profile = validate_profile(profile)?;
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == original_name)
            .ok_or_else(|| ValidationError::UnknownProfile(original_name.to_string()))?;

        if profile.name != original_name {
            if self.find_profile(&profile.name).is_some() {
                return Err(ValidationError::DuplicateProfile(profile.name));
            }
            for entry in self.entries.iter_mut().filter(|e| e.profile_name == original_name) {
                entry.profile_name = profile.name.clone();
            }
            if self.default_profile == original_name {
                self.default_profile = profile.name.clone();
            }
        }

        self.profiles[index] = profile;
        Ok(())
    }

    /// Remove a profile.
    ///
    /// Refuses while entries reference it unless `force` is set; forced
    /// removal leaves those entries pointing at a missing profile.
    pub fn remove_profile(&mut self, name: &str, force: bool) -> Result<SpeedProfile, ValidationError> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ValidationError::UnknownProfile(name.to_string()))?;

        let count = self.profile_references(name);
        if count > 0 && !force {
            return Err(ValidationError::ProfileInUse {
                name: name.to_string(),
                count,
            });
        }
        Ok(self.profiles.remove(index))
    }

    /// Set the fallback profile. An empty name clears it.
    pub fn set_default_profile(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if !name.is_empty() && self.find_profile(name).is_none() {
            return Err(ValidationError::UnknownProfile(name.to_string()));
        }
        self.default_profile = name.to_string();
        Ok(())
    }

    // ── Entries ──────────────────────────────────────────────────────

    fn validate_entry(&self, entry: &ScheduleEntry) -> Result<(), ValidationError> {
        if entry.start_time.is_none() {
            return Err(ValidationError::InvalidTime { field: "start" });
        }
        if entry.end_time.is_none() {
            return Err(ValidationError::InvalidTime { field: "end" });
        }
        if entry.profile_name.is_empty() {
            return Err(ValidationError::NoProfileSelected);
        }
        if self.find_profile(&entry.profile_name).is_none() {
            return Err(ValidationError::UnknownProfile(entry.profile_name.clone()));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ValidationError> {
        if index >= self.entries.len() {
            return Err(ValidationError::OutOfBounds {
                collection: "entries",
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    /// Append an entry. It is evaluated after every existing entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) -> Result<(), ValidationError> {
        self.validate_entry(&entry)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn update_entry(&mut self, index: usize, entry: ScheduleEntry) -> Result<(), ValidationError> {
        self.check_index(index)?;
        self.validate_entry(&entry)?;
        self.entries[index] = entry;
        Ok(())
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<ScheduleEntry, ValidationError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Move an entry to a new position. Earlier entries win overlaps.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}

fn validate_profile(mut profile: SpeedProfile) -> Result<SpeedProfile, ValidationError> {
    profile.name = profile.name.trim().to_string();
    if profile.name.is_empty() {
        return Err(ValidationError::EmptyProfileName);
    }
    if profile.download_limit < -1 {
        return Err(ValidationError::InvalidLimit {
            direction: "download",
            value: profile.download_limit,
        });
    }
    if profile.upload_limit < -1 {
        return Err(ValidationError::InvalidLimit {
            direction: "upload",
            value: profile.upload_limit,
        });
    }
    debug_assert!(profile.is_valid());
    Ok(profile)
}

/// `"HH:MM"` for required times; malformed values are load errors.
mod hhmm_strict {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::schedule::hhmm;

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hhmm::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }
}
