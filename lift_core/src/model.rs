//! The Model: all state the core owns.
//!
//! Exactly one Model exists per engine. It is mutated only by the update
//! function, one event at a time; the host never sees it directly and only
//! receives read-only ViewModel projections of it.

use crate::effect::RequestId;
use crate::types::{Workout, WorkoutSummary};
use serde::{Deserialize, Serialize};

/// Default number of timer ticks between debounced snapshot saves
pub const DEFAULT_SNAPSHOT_EVERY_TICKS: u32 = 5;

/// Top-level navigation tabs
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Workout,
    History,
}

/// Mutable domain state owned exclusively by the core
#[derive(Clone, Debug)]
pub struct Model {
    /// The in-progress workout, if any
    pub current_workout: Option<Workout>,
    /// Elapsed seconds of the in-progress workout, driven by timer ticks
    pub timer_seconds: u32,
    /// Ticks received for the current timer session; drives snapshot cadence
    pub tick_count: u64,
    /// Whether a timer session is live
    pub timer_running: bool,
    /// Correlation id of the live timer start request (the tick stream)
    pub timer_request: Option<RequestId>,
    /// Unsaved edits are pending a debounced snapshot save
    pub snapshot_dirty: bool,
    /// Ticks between debounced snapshot saves; set from config at boot
    pub snapshot_every_ticks: u32,
    /// Active navigation tab
    pub active_tab: Tab,
    /// Cached summaries of past workouts, newest first
    pub history: Vec<WorkoutSummary>,
    /// A fully loaded past workout, for the history detail view
    pub history_detail: Option<Workout>,
    /// Last user-visible error message, if any
    pub error: Option<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            current_workout: None,
            timer_seconds: 0,
            tick_count: 0,
            timer_running: false,
            timer_request: None,
            snapshot_dirty: false,
            snapshot_every_ticks: DEFAULT_SNAPSHOT_EVERY_TICKS,
            active_tab: Tab::default(),
            history: Vec::new(),
            history_detail: None,
            error: None,
        }
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user-visible error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("model error: {}", message);
        self.error = Some(message);
    }

    /// Mutable access to the in-progress workout, recording an error when
    /// there is none
    ///
    /// Every handler that requires an active workout goes through this, so
    /// the "no active workout" case is a message plus no-op, never a panic.
    pub fn workout_mut_or_error(&mut self) -> Option<&mut Workout> {
        if self.current_workout.is_none() {
            self.set_error("No workout is in progress");
            return None;
        }
        self.current_workout.as_mut()
    }
}
