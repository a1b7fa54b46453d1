//! Bandwidth scheduler state machine.
//!
//! Like the rest of the crate's engines it owns no thread or timer: the
//! caller invokes `start()` once and then `tick()` periodically (see
//! [`spawn`](super::spawn) for the tokio driver).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running (self-loop on every tick)
//! ```
//!
//! Two signals are tracked independently, each with its own "last
//! announced" cell:
//!
//! - the legacy alternative-limits flag
//! - the resolved speed profile name
//!
//! `start()` announces both unconditionally. `tick()` announces a signal
//! only when its value differs from the last announcement of that signal.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::events::Event;
use crate::schedule::{resolve, SpeedProfile};
use crate::storage::{PreferencesSnapshot, SchedulePreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Both signals evaluated at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub at: NaiveDateTime,
    pub alternative: bool,
    pub profile: String,
    /// Limits of `profile` from the same snapshot; `None` when it dangles.
    pub limits: Option<SpeedProfile>,
}

impl Evaluation {
    /// Evaluate a snapshot at `at`. Pure.
    pub fn of(snapshot: &PreferencesSnapshot, at: NaiveDateTime) -> Self {
        let now = at.time();
        let iso_day = at.weekday().number_from_monday();
        let profile = resolve(now, iso_day, &snapshot.entries, &snapshot.default_profile);
        Self {
            at,
            alternative: snapshot.alternative_window.is_active(now, iso_day),
            limits: snapshot.find_profile(profile).cloned(),
            profile: profile.to_string(),
        }
    }
}

pub struct BandwidthScheduler<S, C> {
    store: S,
    clock: C,
    state: SchedulerState,
    last_alternative: Option<bool>,
    last_profile: Option<String>,
}

impl<S: SchedulePreferences, C: Clock> BandwidthScheduler<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            state: SchedulerState::Idle,
            last_alternative: None,
            last_profile: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_alternative(&self) -> Option<bool> {
        self.last_alternative
    }

    pub fn last_profile(&self) -> Option<&str> {
        self.last_profile.as_deref()
    }

    /// Read a fresh snapshot and evaluate both signals now.
    pub fn evaluate(&self) -> Evaluation {
        let snapshot = self.store.snapshot();
        let evaluation = Evaluation::of(&snapshot, self.clock.now());
        debug!(
            at = %evaluation.at,
            alternative = evaluation.alternative,
            profile = %evaluation.profile,
            "evaluated schedule"
        );
        if !evaluation.profile.is_empty() && evaluation.limits.is_none() {
            warn!(profile = %evaluation.profile, "resolved profile does not exist in the store");
        }
        evaluation
    }

    pub fn is_time_for_alternative(&self) -> bool {
        self.evaluate().alternative
    }

    pub fn current_speed_profile(&self) -> String {
        self.evaluate().profile
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Announce both signals and enter `Running`.
    ///
    /// Returns no events when already running.
    pub fn start(&mut self) -> Vec<Event> {
        if self.state == SchedulerState::Running {
            return Vec::new();
        }
        let evaluation = self.evaluate();
        self.state = SchedulerState::Running;
        info!(
            alternative = evaluation.alternative,
            profile = %evaluation.profile,
            "bandwidth scheduler started"
        );

        self.last_alternative = Some(evaluation.alternative);
        self.last_profile = Some(evaluation.profile.clone());
        vec![
            Event::AlternativeLimitsRequested {
                active: evaluation.alternative,
                at: evaluation.at,
            },
            Event::SpeedProfileRequested {
                profile: evaluation.profile,
                at: evaluation.at,
            },
        ]
    }

    /// Re-evaluate and return change announcements. No-op while `Idle`.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != SchedulerState::Running {
            return Vec::new();
        }
        let evaluation = self.evaluate();
        let mut events = Vec::new();

        if self.last_alternative != Some(evaluation.alternative) {
            info!(active = evaluation.alternative, "alternative limits changed");
            self.last_alternative = Some(evaluation.alternative);
            events.push(Event::AlternativeLimitsRequested {
                active: evaluation.alternative,
                at: evaluation.at,
            });
        }

        if self.last_profile.as_deref() != Some(evaluation.profile.as_str()) {
            info!(
                from = self.last_profile.as_deref().unwrap_or_default(),
                to = %evaluation.profile,
                "speed profile changed"
            );
            self.last_profile = Some(evaluation.profile.clone());
            events.push(Event::SpeedProfileRequested {
                profile: evaluation.profile,
                at: evaluation.at,
            });
        }

        events
    }
}
