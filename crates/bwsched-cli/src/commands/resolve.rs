use bwsched_core::schedule::{active_entry, hhmm};
use bwsched_core::{BandwidthScheduler, Config, ManualClock, SpeedProfile};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use clap::Args;
use serde::Serialize;

#[derive(Args)]
pub struct ResolveArgs {
    /// Instant to evaluate: "YYYY-MM-DD HH:MM", "<day> HH:MM" (this week) or
    /// "HH:MM" (today). Defaults to now.
    #[arg(long)]
    at: Option<String>,
}

#[derive(Serialize)]
struct Resolution {
    at: NaiveDateTime,
    weekday: String,
    profile: String,
    /// 1-based number of the winning entry, absent when the default applied.
    entry: Option<usize>,
    limits: Option<SpeedProfile>,
    alternative_limits: bool,
}

pub fn run(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now().naive_local();
    let at = match args.at.as_deref() {
        Some(raw) => parse_at(raw, now.date())?,
        None => now,
    };

    let config = Config::load()?;
    let entry = active_entry(at.time(), at.weekday().number_from_monday(), &config.entries)
        .and_then(|winner| config.entries.iter().position(|e| std::ptr::eq(e, winner)))
        .map(|i| i + 1);

    let evaluation = BandwidthScheduler::new(config, ManualClock::new(at)).evaluate();
    let resolution = Resolution {
        at: evaluation.at,
        weekday: at.weekday().to_string(),
        limits: evaluation.limits,
        profile: evaluation.profile,
        entry,
        alternative_limits: evaluation.alternative,
    };
    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

/// Parse `--at`, resolving day names and bare times relative to `today`.
fn parse_at(raw: &str, today: NaiveDate) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(at);
        }
    }

    let invalid = || format!("cannot parse --at '{raw}'");
    let (date, time) = match raw.split_once(char::is_whitespace) {
        Some((day, time)) => {
            let day: Weekday = day.parse().map_err(|_| invalid())?;
            let offset = i64::from(day.num_days_from_monday())
                - i64::from(today.weekday().num_days_from_monday());
            (today + TimeDelta::days(offset), time)
        }
        None => (today, raw),
    };
    let time = hhmm::parse(time).ok_or_else(invalid)?;
    Ok(date.and_time(time))
}
