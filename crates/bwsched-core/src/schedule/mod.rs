//! Speed profiles, schedule entries and the rules that pick between them.
//!
//! Everything in this module is pure: no clock reads, no I/O. The
//! [`scheduler`](crate::scheduler) drives these functions with wall-clock
//! time and a store snapshot.

mod days;
mod entry;
mod legacy;
mod profile;
mod resolver;
mod window;

pub use days::{day_matches, lenient_code, DayPattern, DaySelector, UNRECOGNIZED_DAY_CODE};
pub use entry::{hhmm, ScheduleEntry};
pub use legacy::AlternativeWindow;
pub use profile::{SpeedProfile, UNLIMITED};
pub use resolver::{active_entry, resolve, resolve_at, resolve_profile};
pub use window::{clock_minute, in_window};
