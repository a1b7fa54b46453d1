use std::time::Duration;

use bwsched_core::storage::config_path;
use bwsched_core::{spawn, BandwidthScheduler, Config, LocalClock, SharedConfig};
use clap::Args;
use tracing::info;

#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between evaluations (overrides scheduler.tick_secs)
    #[arg(long)]
    tick_secs: Option<u64>,
}

pub fn run(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Creates the file with defaults on first use so it can be watched.
    let config = Config::load()?;
    let period = match args.tick_secs {
        Some(secs) => Duration::from_secs(secs.max(1)),
        None => config.scheduler.tick_period(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let path = config_path()?;
        let store = SharedConfig::from_path(&path)?;
        info!(path = %path.display(), ?period, "watching schedule");

        let mut handle = spawn(BandwidthScheduler::new(store, LocalClock), period);

        loop {
            let event = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => break,
                Some(event) = handle.alternative_limits.recv() => event,
                Some(event) = handle.speed_profile.recv() => event,
                else => break,
            };
            println!("{}", serde_json::to_string(&event)?);
        }

        handle.stop().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
