//! Periodic re-evaluation of the active speed profile and legacy
//! alternative-limits flag.

mod driver;
mod engine;

pub use driver::{spawn, SchedulerHandle};
pub use engine::{BandwidthScheduler, Evaluation, SchedulerState};
