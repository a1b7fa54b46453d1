use bwsched_core::schedule::hhmm;
use bwsched_core::{Config, DaySelector, ScheduleEntry};
use chrono::NaiveTime;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum EntryAction {
    /// List schedule entries in evaluation order
    List,
    /// Append a schedule entry
    Add {
        /// Start time (HH:MM)
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        /// End time (HH:MM); earlier than start means the window crosses midnight
        #[arg(value_parser = parse_time)]
        end: NaiveTime,
        /// Profile to apply while the window is active
        #[arg(long)]
        profile: String,
        /// every-day, weekday, weekend, or a day name
        #[arg(long, default_value = "every-day")]
        days: DaySelector,
    },
    /// Edit a schedule entry
    Edit {
        /// Entry number as shown by `entry list`
        number: usize,
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        end: Option<NaiveTime>,
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        days: Option<DaySelector>,
    },
    /// Remove a schedule entry
    Remove {
        /// Entry number as shown by `entry list`
        number: usize,
    },
    /// Move an entry to another position; earlier entries win overlaps
    Move {
        /// Entry number to move
        from: usize,
        /// Target position
        to: usize,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    hhmm::parse(raw).ok_or_else(|| format!("expected HH:MM, got '{raw}'"))
}

/// Entry numbers are 1-based on the command line.
fn index(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "entry numbers start at 1".to_string())
}

fn format_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn run(action: EntryAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EntryAction::List => {
            let config = Config::load()?;
            if config.entries.is_empty() {
                println!("No schedule entries. Default profile: {}", config.default_profile);
                return Ok(());
            }
            for (i, entry) in config.entries.iter().enumerate() {
                let days = entry
                    .days
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "(unrecognized)".to_string());
                let wrap = if entry.wraps_midnight() { " (overnight)" } else { "" };
                let dangling = if config.find_profile(&entry.profile_name).is_none() {
                    " [missing profile]"
                } else {
                    ""
                };
                println!(
                    "#{:<3} {}-{} {:<12} {}{wrap}{dangling}",
                    i + 1,
                    format_time(entry.start_time),
                    format_time(entry.end_time),
                    days,
                    entry.profile_name,
                );
            }
        }
        EntryAction::Add {
            start,
            end,
            profile,
            days,
        } => {
            let mut config = Config::load()?;
            config.add_entry(ScheduleEntry::new(start, end, days, profile))?;
            config.save()?;
            println!("Entry #{} added", config.entries.len());
        }
        EntryAction::Edit {
            number,
            start,
            end,
            profile,
            days,
        } => {
            let i = index(number)?;
            let mut config = Config::load()?;
            let mut entry = config
                .entries
                .get(i)
                .cloned()
                .ok_or_else(|| format!("no entry #{number}"))?;
            if let Some(start) = start {
                entry.start_time = Some(start);
            }
            if let Some(end) = end {
                entry.end_time = Some(end);
            }
            if let Some(days) = days {
                entry.days = Some(days);
            }
            if let Some(profile) = profile {
                entry.profile_name = profile;
            }
            config.update_entry(i, entry)?;
            config.save()?;
            println!("Entry #{number} updated");
        }
        EntryAction::Remove { number } => {
            let mut config = Config::load()?;
            let removed = config.remove_entry(index(number)?)?;
            config.save()?;
            println!("Entry #{number} removed ({})", removed.profile_name);
        }
        EntryAction::Move { from, to } => {
            let mut config = Config::load()?;
            config.move_entry(index(from)?, index(to)?)?;
            config.save()?;
            println!("Entry #{from} moved to #{to}");
        }
    }
    Ok(())
}
