mod config;
mod preferences;
mod shared;

pub use config::{Config, SchedulerConfig, DEFAULT_TICK_SECS};
pub use preferences::{PreferencesSnapshot, SchedulePreferences};
pub use shared::SharedConfig;

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Returns `~/.config/bwsched[-dev]/` based on BWSCHED_ENV.
///
/// Set BWSCHED_ENV=dev to use development data directory. The location is
/// `~/.config` on every platform, macOS included.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoConfigDir)?;
    let env = std::env::var("BWSCHED_ENV").ok();
    let dir = app_dir(&home, env.as_deref());

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn app_dir(home: &Path, env: Option<&str>) -> PathBuf {
    let base_dir = home.join(".config");
    if env == Some("dev") {
        base_dir.join("bwsched-dev")
    } else {
        base_dir.join("bwsched")
    }
}

/// Location of `config.toml`. `BWSCHED_CONFIG` overrides the whole path.
pub fn config_path() -> Result<PathBuf> {
    match std::env::var_os("BWSCHED_CONFIG") {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(data_dir()?.join("config.toml")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_dir_lives_under_dot_config() {
        let home = Path::new("/home/user");
        assert_eq!(app_dir(home, None), PathBuf::from("/home/user/.config/bwsched"));
        assert_eq!(app_dir(home, Some("production")), PathBuf::from("/home/user/.config/bwsched"));
        assert_eq!(app_dir(home, Some("dev")), PathBuf::from("/home/user/.config/bwsched-dev"));
    }
}
