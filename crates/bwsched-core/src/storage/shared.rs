//! Shared, reloadable preferences for a long-running scheduler.
//!
//! Editors (the CLI, another process) write `config.toml`; the scheduler
//! holds a [`SharedConfig`] that picks those edits up on its next
//! snapshot. A file that fails to parse is logged and the last good
//! configuration stays in effect.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::SystemTime;

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use super::config::Config;
use super::preferences::{PreferencesSnapshot, SchedulePreferences};
use crate::error::Result;
use crate::schedule::{DaySelector, ScheduleEntry, SpeedProfile};

#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
    source: Option<Arc<FileSource>>,
}

#[derive(Debug)]
struct FileSource {
    path: PathBuf,
    modified: Mutex<Option<SystemTime>>,
}

impl SharedConfig {
    /// In-memory only; never touches disk.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            source: None,
        }
    }

    /// Backed by a file that is re-read whenever its mtime changes.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let config = Config::load_from(&path)?;
        let modified = modified_time(&path);
        Ok(Self {
            inner: Arc::new(RwLock::new(config)),
            source: Some(Arc::new(FileSource {
                path,
                modified: Mutex::new(modified),
            })),
        })
    }

    /// Clone of the current configuration.
    pub fn read(&self) -> Config {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply an in-memory edit.
    pub fn update<R>(&self, f: impl FnOnce(&mut Config) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Re-read the backing file if it changed since the last read.
    ///
    /// Returns `Ok(true)` when new contents were loaded. A file that fails
    /// to load is not retried until its mtime changes again.
    pub fn reload(&self) -> Result<bool> {
        let Some(source) = &self.source else {
            return Ok(false);
        };

        let current = modified_time(&source.path);
        let mut last = source.modified.lock().unwrap_or_else(PoisonError::into_inner);
        if current == *last {
            return Ok(false);
        }

        let loaded = Config::load_from(&source.path);
        *last = current;
        let config = loaded?;
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = config;
        info!(path = %source.path.display(), "reloaded configuration");
        Ok(true)
    }

    fn refresh(&self) {
        if let Err(e) = self.reload() {
            warn!(error = %e, "keeping previous configuration");
        }
    }

    fn with_config<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        self.refresh();
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

impl SchedulePreferences for SharedConfig {
    fn scheduler_start_time(&self) -> NaiveTime {
        self.with_config(|c| c.scheduler.start_time)
    }

    fn scheduler_end_time(&self) -> NaiveTime {
        self.with_config(|c| c.scheduler.end_time)
    }

    fn scheduler_days(&self) -> DaySelector {
        self.with_config(|c| c.scheduler.days)
    }

    fn schedule_entries(&self) -> Vec<ScheduleEntry> {
        self.with_config(|c| c.entries.clone())
    }

    fn default_speed_profile(&self) -> String {
        self.with_config(|c| c.default_profile.clone())
    }

    fn speed_profiles(&self) -> Vec<SpeedProfile> {
        self.with_config(|c| c.profiles.clone())
    }

    fn find_speed_profile(&self, name: &str) -> Option<SpeedProfile> {
        self.with_config(|c| c.find_profile(name).cloned())
    }

    /// One refresh and one read lock for the whole snapshot.
    fn snapshot(&self) -> PreferencesSnapshot {
        let snapshot = self.with_config(PreferencesSnapshot::from_config);
        debug!(entries = snapshot.entries.len(), "preferences snapshot");
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn update_is_visible_to_clones() {
        let shared = SharedConfig::new(Config::default());
        let other = shared.clone();
        shared.update(|c| c.default_profile = "Night".into());
        assert_eq!(other.default_speed_profile(), "Night");
    }

    #[test]
    fn in_memory_reload_is_noop() {
        let shared = SharedConfig::new(Config::default());
        assert!(!shared.reload().unwrap());
    }

    #[test]
    fn reload_picks_up_file_edits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();

        let shared = SharedConfig::from_path(&path).unwrap();
        assert!(!shared.reload().unwrap());

        let mut edited = Config::default();
        edited.default_profile = "Edited".into();
        edited.save_to(&path).unwrap();
        // Force a different mtime even on coarse-grained filesystems.
        shared
            .source
            .as_ref()
            .unwrap()
            .modified
            .lock()
            .unwrap()
            .take();

        assert!(shared.reload().unwrap());
        assert_eq!(shared.read().default_profile, "Edited");
    }

    #[test]
    fn broken_file_keeps_last_good_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        let shared = SharedConfig::from_path(&path).unwrap();

        std::fs::write(&path, "default_profile = [").unwrap();
        shared.source.as_ref().unwrap().modified.lock().unwrap().take();

        assert!(shared.reload().is_err());
        assert_eq!(shared.default_speed_profile(), "Normal");
    }

    #[test]
    fn broken_file_is_not_reparsed_until_it_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        let shared = SharedConfig::from_path(&path).unwrap();

        std::fs::write(&path, "default_profile = [").unwrap();
        shared.source.as_ref().unwrap().modified.lock().unwrap().take();

        assert!(shared.reload().is_err());
        // Same mtime: skipped without reading the file.
        assert!(!shared.reload().unwrap());
        assert!(!shared.reload().unwrap());

        let mut fixed = Config::default();
        fixed.default_profile = "Fixed".into();
        fixed.save_to(&path).unwrap();
        shared.source.as_ref().unwrap().modified.lock().unwrap().take();

        assert!(shared.reload().unwrap());
        assert_eq!(shared.default_speed_profile(), "Fixed");
    }

    #[test]
    fn deleted_file_is_tried_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();
        let shared = SharedConfig::from_path(&path).unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(shared.reload().is_err());
        assert!(!shared.reload().unwrap());
        assert_eq!(shared.default_speed_profile(), "Normal");
    }
}
