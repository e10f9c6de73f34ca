//! Effect requests and capability outcomes.
//!
//! Effects are the only way the core touches the outside world: the update
//! function describes what it needs as [`EffectRequest`] values, the host
//! executes them and answers with outcome payloads carried back inside
//! ordinary response events. Every request carries a unique correlation id;
//! the outcome echoes it so the correlator can route the response to the
//! request that caused it.
//!
//! All of these types cross the serialization boundary, so every enum uses a
//! tagged (never positional) encoding: adding a variant cannot corrupt the
//! decoding of existing ones.

use crate::types::{Workout, WorkoutSummary};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation identifier for an effect request
///
/// Strictly increasing, assigned at request creation, never reused within a
/// process lifetime.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A side effect the core cannot perform itself
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EffectRequest {
    pub id: RequestId,
    pub op: EffectOp,
}

/// The capability operation an effect request asks for
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectOp {
    /// Durable workout history storage
    Persistence { op: PersistenceOp },
    /// Single-slot recovery storage for the in-progress workout
    Snapshot { op: SnapshotOp },
    /// Elapsed-time tick source
    Timer { op: TimerOp },
    /// A new ViewModel may now be pulled; fire-and-forget
    Render,
}

impl EffectOp {
    /// Whether the host owes a response for this operation
    ///
    /// Render is the one fire-and-forget request.
    pub fn expects_response(&self) -> bool {
        !matches!(self, EffectOp::Render)
    }

    /// Whether this operation opens a recurring tick stream
    ///
    /// Timer starts stay in flight until explicitly retired at stop time;
    /// every other tracked request is consumed by its single response.
    pub fn opens_tick_stream(&self) -> bool {
        matches!(self, EffectOp::Timer { op: TimerOp::Start })
    }
}

/// Durable persistence operations
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersistenceOp {
    /// Save a finished workout; replace-if-exists by workout id
    SaveWorkout { workout: Workout },
    /// Load summaries of all stored workouts
    LoadAllWorkouts,
    /// Load one stored workout in full
    LoadWorkoutById { workout_id: Uuid },
    /// Delete one stored workout
    DeleteWorkout { workout_id: Uuid },
}

/// Single-slot snapshot operations for crash recovery
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotOp {
    SaveCurrent { workout: Workout },
    LoadCurrent,
    DeleteCurrent,
}

/// Timer operations
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerOp {
    Start,
    Stop,
}

/// Outcome of a persistence operation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersistenceOutcome {
    /// The workout reached the primary store
    Saved,
    /// The primary store failed; the payload is durable in the fallback
    /// location and the host will keep retrying in the background
    SavedToFallback,
    /// Result of a LoadAllWorkouts
    Summaries { workouts: Vec<WorkoutSummary> },
    /// Result of a LoadWorkoutById; None when no such workout exists
    Loaded { workout: Option<Workout> },
    /// The workout was deleted
    Deleted,
    /// Hard failure, after the fallback path was also exhausted
    Failed { message: String },
}

/// Outcome of a snapshot-storage operation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotOutcome {
    /// Save or delete completed
    Ok,
    /// Result of a LoadCurrent; None when the slot is empty
    Loaded { workout: Option<Workout> },
    Failed { message: String },
}

/// Outcome of a timer operation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerOutcome {
    /// One unit of elapsed time; recurs while the timer is started
    Tick,
    /// Acknowledgment of a stop; no tick follows for that session
    Stopped,
}
