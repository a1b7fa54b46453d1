//! # bwsched Core Library
//!
//! Decides which named speed-limit profile is active at any instant, given
//! a set of weekly time windows, and announces changes. The CLI binary is a
//! thin layer over this library.
//!
//! ## Architecture
//!
//! - **Schedule**: pure data model and resolver. Profiles, entries, the
//!   day-selector matcher, first-match resolution with midnight wrap, and
//!   the legacy alternative-limits window.
//! - **Scheduler**: a wall-clock-driven state machine that re-evaluates on
//!   every `tick()` and reports changes, plus a tokio driver that ticks it
//!   on a fixed period.
//! - **Storage**: TOML-based preferences store and the read-only
//!   [`SchedulePreferences`] interface the scheduler is built against.
//!
//! ## Key Components
//!
//! - [`resolve`]: current time + entries → profile name
//! - [`BandwidthScheduler`]: change-detecting state machine
//! - [`Config`]: persisted preferences and editing boundary
//! - [`SharedConfig`]: reloadable store for long-running schedulers

pub mod clock;
pub mod error;
pub mod events;
pub mod schedule;
pub mod scheduler;
pub mod storage;

pub use clock::{Clock, LocalClock, ManualClock};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use schedule::{
    day_matches, resolve, resolve_at, resolve_profile, AlternativeWindow, DayPattern, DaySelector,
    ScheduleEntry, SpeedProfile, UNLIMITED,
};
pub use scheduler::{spawn, BandwidthScheduler, Evaluation, SchedulerHandle, SchedulerState};
pub use storage::{Config, PreferencesSnapshot, SchedulePreferences, SharedConfig};
