//! Tokio driver for [`BandwidthScheduler`].
//!
//! Runs the engine on one task: announce at start, then tick on a fixed
//! period. Each tick runs to completion before the next one is scheduled.
//! The two signals are delivered on two separate channels, each event
//! stamped with the instant it was evaluated at.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::BandwidthScheduler;
use crate::clock::Clock;
use crate::events::Event;
use crate::storage::SchedulePreferences;

/// Receivers for a running scheduler.
///
/// Dropping the handle stops the scheduler task.
pub struct SchedulerHandle {
    /// Legacy alternative-limits flag changes
    /// ([`Event::AlternativeLimitsRequested`] only).
    pub alternative_limits: mpsc::UnboundedReceiver<Event>,
    /// Speed profile changes ([`Event::SpeedProfileRequested`] only).
    pub speed_profile: mpsc::UnboundedReceiver<Event>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the scheduler and wait for its task to end.
    pub async fn stop(mut self) {
        self.task.abort();
        let _ = (&mut self.task).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Outlets {
    alternative: mpsc::UnboundedSender<Event>,
    profile: mpsc::UnboundedSender<Event>,
}

impl Outlets {
    fn dispatch(&self, events: Vec<Event>) {
        for event in events {
            // A closed receiver only silences its own signal.
            let outlet = match event {
                Event::AlternativeLimitsRequested { .. } => &self.alternative,
                Event::SpeedProfileRequested { .. } => &self.profile,
            };
            let _ = outlet.send(event);
        }
    }

    fn all_closed(&self) -> bool {
        self.alternative.is_closed() && self.profile.is_closed()
    }
}

/// Start `scheduler` on the current tokio runtime, ticking every `period`.
pub fn spawn<S, C>(mut scheduler: BandwidthScheduler<S, C>, period: Duration) -> SchedulerHandle
where
    S: SchedulePreferences + Send + 'static,
    C: Clock + Send + 'static,
{
    let (alternative_tx, alternative_rx) = mpsc::unbounded_channel();
    let (profile_tx, profile_rx) = mpsc::unbounded_channel();
    let outlets = Outlets {
        alternative: alternative_tx,
        profile: profile_tx,
    };

    let task = tokio::spawn(async move {
        outlets.dispatch(scheduler.start());

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(?period, "scheduler loop armed");

        loop {
            interval.tick().await;
            let events = scheduler.tick();
            debug!(count = events.len(), "scheduler tick");
            outlets.dispatch(events);
            if outlets.all_closed() {
                info!("all listeners gone, scheduler loop exiting");
                break;
            }
        }
    });

    SchedulerHandle {
        alternative_limits: alternative_rx,
        speed_profile: profile_rx,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::schedule::{DaySelector, ScheduleEntry, SpeedProfile};
    use crate::storage::{Config, SharedConfig};
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use tokio::sync::mpsc::error::TryRecvError;

    const PERIOD: Duration = Duration::from_secs(30);

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn tuesday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap().and_time(t(h, m))
    }

    fn active(event: Option<Event>) -> Option<bool> {
        event.and_then(|e| e.alternative_limits())
    }

    fn profile(event: Option<Event>) -> Option<String> {
        event.and_then(|e| e.speed_profile().map(str::to_string))
    }

    fn config() -> Config {
        let mut cfg = Config::default();
        cfg.add_profile(SpeedProfile::new("Work", 1024, 1024)).unwrap();
        cfg.add_profile(SpeedProfile::unlimited("Night")).unwrap();
        cfg.add_entry(ScheduleEntry::new(t(8, 0), t(18, 0), DaySelector::WEEKDAY, "Work"))
            .unwrap();
        cfg.add_entry(ScheduleEntry::new(t(18, 0), t(8, 0), DaySelector::EVERY_DAY, "Night"))
            .unwrap();
        cfg
    }

    #[tokio::test(start_paused = true)]
    async fn announces_at_start_then_only_on_change() {
        let clock = ManualClock::new(tuesday(9, 0));
        let mut handle = spawn(BandwidthScheduler::new(config(), clock.clone()), PERIOD);

        assert_eq!(active(handle.alternative_limits.recv().await), Some(true));
        assert_eq!(profile(handle.speed_profile.recv().await).as_deref(), Some("Work"));

        // Several periods with no wall-clock change: nothing new.
        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(handle.speed_profile.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(handle.alternative_limits.try_recv(), Err(TryRecvError::Empty));

        clock.set(tuesday(19, 0));
        assert_eq!(profile(handle.speed_profile.recv().await).as_deref(), Some("Night"));

        clock.set(tuesday(21, 0));
        assert_eq!(active(handle.alternative_limits.recv().await), Some(false));
        assert_eq!(handle.speed_profile.try_recv(), Err(TryRecvError::Empty));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn events_carry_evaluation_time() {
        let clock = ManualClock::new(tuesday(9, 0));
        let mut handle = spawn(BandwidthScheduler::new(config(), clock.clone()), PERIOD);

        let first = handle.speed_profile.recv().await.unwrap();
        assert_eq!(first.at(), tuesday(9, 0));
        let first = handle.alternative_limits.recv().await.unwrap();
        assert_eq!(first.at(), tuesday(9, 0));

        clock.set(tuesday(19, 0));
        let change = handle.speed_profile.recv().await.unwrap();
        assert_eq!(
            change,
            Event::SpeedProfileRequested {
                profile: "Night".into(),
                at: tuesday(19, 0),
            }
        );

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn picks_up_store_edits() {
        let shared = SharedConfig::new(config());
        let clock = ManualClock::new(tuesday(9, 0));
        let mut handle = spawn(BandwidthScheduler::new(shared.clone(), clock), PERIOD);
        assert_eq!(profile(handle.speed_profile.recv().await).as_deref(), Some("Work"));

        shared.update(|c| c.entries.clear());
        assert_eq!(profile(handle.speed_profile.recv().await).as_deref(), Some("Normal"));
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_receivers_are_gone() {
        let clock = ManualClock::new(tuesday(9, 0));
        let mut handle = spawn(BandwidthScheduler::new(config(), clock), PERIOD);
        handle.alternative_limits.close();
        handle.speed_profile.close();

        tokio::time::sleep(PERIOD * 2).await;
        assert!(handle.is_finished());
    }
}
