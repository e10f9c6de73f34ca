//! The closed set of events the core responds to.
//!
//! Everything that happens to the app arrives here: user intents from the
//! shell, the boot event, and host responses to earlier effect requests.
//! Response variants carry the correlation id of the request they answer;
//! the update function refuses to process one whose id is not in flight.

use crate::effect::{PersistenceOutcome, RequestId, SnapshotOutcome, TimerOutcome};
use crate::model::Tab;
use crate::types::{Equipment, SetValues};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single input to the update function
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // ========================================================================
    // Lifecycle
    // ========================================================================
    /// First event after process start; kicks off snapshot recovery and the
    /// initial history load
    Launched,

    // ========================================================================
    // Active workout
    // ========================================================================
    /// Begin a new workout; the shell supplies the wall-clock start time
    StartWorkout {
        at: chrono::DateTime<chrono::Utc>,
    },
    /// Stamp the elapsed duration, save to history, and clear the slate
    FinishWorkout,
    /// Abandon the current workout without saving it to history
    DiscardWorkout,

    // ========================================================================
    // Exercises
    // ========================================================================
    AddExercise {
        name: String,
        equipment: Equipment,
    },
    DeleteExercise {
        exercise_id: Uuid,
    },
    /// Swap the exercises at two display positions
    MoveExercise {
        from: usize,
        to: usize,
    },

    // ========================================================================
    // Sets
    // ========================================================================
    AddSet {
        exercise_id: Uuid,
    },
    DeleteSet {
        exercise_id: Uuid,
        set_id: Uuid,
    },
    /// Edit the planned side of a set
    UpdateSetSuggested {
        exercise_id: Uuid,
        set_id: Uuid,
        patch: SetPatch,
    },
    /// Edit the performed side of a set
    UpdateSetActual {
        exercise_id: Uuid,
        set_id: Uuid,
        patch: SetPatch,
    },
    ToggleSetCompleted {
        exercise_id: Uuid,
        set_id: Uuid,
    },

    // ========================================================================
    // Workout metadata
    // ========================================================================
    UpdateWorkoutName {
        name: String,
    },
    UpdateWorkoutNote {
        note: String,
    },
    /// The shell signals the user left an editing context; flush any
    /// debounced snapshot immediately
    CommitEdits,

    // ========================================================================
    // Navigation and history
    // ========================================================================
    ChangeTab {
        tab: Tab,
    },
    RefreshHistory,
    SelectHistoryWorkout {
        workout_id: Uuid,
    },
    DeleteHistoryWorkout {
        workout_id: Uuid,
    },

    // ========================================================================
    // Host responses
    // ========================================================================
    PersistenceResponded {
        request: RequestId,
        outcome: PersistenceOutcome,
    },
    SnapshotResponded {
        request: RequestId,
        outcome: SnapshotOutcome,
    },
    TimerResponded {
        request: RequestId,
        outcome: TimerOutcome,
    },
}

impl Event {
    /// Whether this event is a host response rather than a user intent
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            Event::PersistenceResponded { .. }
                | Event::SnapshotResponded { .. }
                | Event::TimerResponded { .. }
        )
    }

    /// User-originated events clear any stale error banner before handling
    pub fn is_user_intent(&self) -> bool {
        !self.is_response() && !matches!(self, Event::Launched)
    }
}

/// A partial update to one side of a set
///
/// Fields left as None are untouched, so the shell can send exactly the
/// field the user edited.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
}

impl SetPatch {
    /// Apply present fields to the target values; returns true if anything
    /// was written
    pub fn apply(&self, target: &mut SetValues) -> bool {
        let mut changed = false;
        if let Some(weight) = self.weight_kg {
            target.weight_kg = Some(weight);
            changed = true;
        }
        if let Some(reps) = self.reps {
            target.reps = Some(reps);
            changed = true;
        }
        if let Some(duration) = self.duration_seconds {
            target.duration_seconds = Some(duration);
            changed = true;
        }
        if let Some(rpe) = self.rpe {
            target.rpe = Some(rpe);
            changed = true;
        }
        if let Some(rest) = self.rest_seconds {
            target.rest_seconds = Some(rest);
            changed = true;
        }
        changed
    }
}
