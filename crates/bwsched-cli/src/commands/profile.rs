use bwsched_core::{Config, SpeedProfile};
use clap::Subcommand;

use super::{DisplayLimit, KibLimit};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List speed profiles
    List,
    /// Add a speed profile
    Add {
        /// Profile name
        name: String,
        /// Download limit in KiB/s, or "unlimited"
        #[arg(long, default_value = "unlimited")]
        download: KibLimit,
        /// Upload limit in KiB/s, or "unlimited"
        #[arg(long, default_value = "unlimited")]
        upload: KibLimit,
    },
    /// Edit a speed profile; renaming updates every entry that uses it
    Edit {
        /// Current profile name
        name: String,
        /// New name
        #[arg(long)]
        rename: Option<String>,
        /// Download limit in KiB/s, or "unlimited"
        #[arg(long)]
        download: Option<KibLimit>,
        /// Upload limit in KiB/s, or "unlimited"
        #[arg(long)]
        upload: Option<KibLimit>,
    },
    /// Remove a speed profile
    Remove {
        /// Profile name
        name: String,
        /// Remove even if schedule entries still use it
        #[arg(long)]
        force: bool,
    },
    /// Set the profile used when no schedule entry is active
    Default {
        /// Profile name (empty string clears it)
        name: String,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::List => {
            let config = Config::load()?;
            if config.profiles.is_empty() {
                println!("No profiles.");
                return Ok(());
            }
            for profile in &config.profiles {
                let marker = if profile.name == config.default_profile { "*" } else { " " };
                println!(
                    "{marker} {:<20} down {:<14} up {}",
                    profile.name,
                    DisplayLimit(profile.download_limit).to_string(),
                    DisplayLimit(profile.upload_limit),
                );
            }
        }
        ProfileAction::Add {
            name,
            download,
            upload,
        } => {
            let mut config = Config::load()?;
            config.add_profile(SpeedProfile::new(
                name.trim(),
                download.to_bytes(),
                upload.to_bytes(),
            ))?;
            config.save()?;
            println!("Profile added: {}", name.trim());
        }
        ProfileAction::Edit {
            name,
            rename,
            download,
            upload,
        } => {
            let mut config = Config::load()?;
            let current = config
                .find_profile(&name)
                .cloned()
                .ok_or_else(|| format!("unknown profile: {name}"))?;
            let updated = SpeedProfile {
                name: rename.unwrap_or_else(|| current.name.clone()),
                download_limit: download.map_or(current.download_limit, KibLimit::to_bytes),
                upload_limit: upload.map_or(current.upload_limit, KibLimit::to_bytes),
            };
            config.update_profile(&name, updated)?;
            config.save()?;
            println!("Profile updated: {name}");
        }
        ProfileAction::Remove { name, force } => {
            let mut config = Config::load()?;
            let removed = config.remove_profile(&name, force)?;
            config.save()?;
            println!("Profile removed: {}", removed.name);
        }
        ProfileAction::Default { name } => {
            let mut config = Config::load()?;
            config.set_default_profile(&name)?;
            config.save()?;
            println!("Default profile: {}", config.default_profile);
        }
    }
    Ok(())
}
