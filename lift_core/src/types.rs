//! Core domain types for the replog workout logger.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workouts and their exercises
//! - Exercise sets with suggested/actual value groups
//! - History summaries for past workouts
//!
//! A `Workout` is a single aggregate: exercises and sets nest inside it, and
//! child records carry owner ids as back-references only, never as ownership
//! edges. The in-progress workout is exclusively owned by the Model until it
//! is finished (handed to persistence) or discarded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default rest between working sets, in seconds
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// Default warm-up duration before an exercise, in seconds
pub const DEFAULT_WARMUP_SECONDS: u32 = 60;

// ============================================================================
// Exercise Types
// ============================================================================

/// Equipment/type tag for an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    Bodyweight,
    Band,
    Other(String),
}

impl Equipment {
    /// Display label for the tag
    pub fn label(&self) -> &str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Machine => "Machine",
            Equipment::Cable => "Cable",
            Equipment::Bodyweight => "Bodyweight",
            Equipment::Band => "Band",
            Equipment::Other(name) => name,
        }
    }
}

/// One value group on a set: what was planned, or what was performed
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetValues {
    pub weight_kg: Option<f64>,
    pub reps: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rpe: Option<u8>,
    pub rest_seconds: Option<u32>,
}

impl SetValues {
    /// True when no field of the group is filled in
    pub fn is_empty(&self) -> bool {
        self.weight_kg.is_none()
            && self.reps.is_none()
            && self.duration_seconds.is_none()
            && self.rpe.is_none()
            && self.rest_seconds.is_none()
    }

    /// Training volume contributed by this group (weight × reps), if both known
    pub fn volume_kg(&self) -> Option<f64> {
        match (self.weight_kg, self.reps) {
            (Some(weight), Some(reps)) => Some(weight * f64::from(reps)),
            _ => None,
        }
    }
}

/// A single set within an exercise
///
/// Positions are zero-based and contiguous among a given exercise's sets at
/// all times; [`Exercise::remove_set`] restores contiguity after a deletion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub position: u32,
    pub suggested: SetValues,
    pub actual: SetValues,
    pub completed: bool,
}

/// An exercise performed within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
    pub equipment: Equipment,
    pub sets: Vec<ExerciseSet>,
    pub rest_seconds: u32,
    pub warmup_seconds: u32,
}

impl Exercise {
    /// Create an empty exercise owned by the given workout
    pub fn new(workout_id: Uuid, name: impl Into<String>, equipment: Equipment) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            name: name.into(),
            equipment,
            sets: Vec::new(),
            rest_seconds: DEFAULT_REST_SECONDS,
            warmup_seconds: DEFAULT_WARMUP_SECONDS,
        }
    }

    /// Append a new set at the end of the exercise
    ///
    /// The new set takes position `len`, inherits the previous set's
    /// suggested values (plan continuity), and starts incomplete. Existing
    /// positions are untouched. Returns the new set's id.
    pub fn add_set(&mut self) -> Uuid {
        let suggested = self
            .sets
            .last()
            .map(|prev| prev.suggested.clone())
            .unwrap_or_default();

        let set = ExerciseSet {
            id: Uuid::new_v4(),
            exercise_id: self.id,
            position: self.sets.len() as u32,
            suggested,
            actual: SetValues::default(),
            completed: false,
        };
        let id = set.id;
        self.sets.push(set);
        id
    }

    /// Remove a set by id, re-indexing the remainder to `0..len`
    ///
    /// Returns false (and changes nothing) when the id is not present.
    pub fn remove_set(&mut self, set_id: Uuid) -> bool {
        let Some(index) = self.sets.iter().position(|s| s.id == set_id) else {
            return false;
        };
        self.sets.remove(index);
        for (position, set) in self.sets.iter_mut().enumerate() {
            set.position = position as u32;
        }
        true
    }

    /// Mutable lookup of a set by id
    pub fn set_mut(&mut self, set_id: Uuid) -> Option<&mut ExerciseSet> {
        self.sets.iter_mut().find(|s| s.id == set_id)
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// A logged workout: the aggregate the core owns while in progress
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub note: Option<String>,
    pub duration_seconds: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub exercises: Vec<Exercise>,
}

impl Workout {
    /// Create a fresh workout started at the given instant
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "New Workout".into(),
            note: None,
            duration_seconds: None,
            started_at,
            ended_at: None,
            exercises: Vec::new(),
        }
    }

    /// Mutable lookup of an exercise by id
    pub fn exercise_mut(&mut self, exercise_id: Uuid) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }

    /// Total number of sets across all exercises
    pub fn set_count(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets.len() as u32).sum()
    }

    /// Number of completed sets across all exercises
    pub fn completed_set_count(&self) -> u32 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .count() as u32
    }

    /// Total volume (weight × reps) across completed sets, from actual values
    pub fn total_volume_kg(&self) -> f64 {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .filter_map(|s| s.actual.volume_kg())
            .sum()
    }

    /// Stamp the end of the workout from the core's elapsed-seconds counter
    ///
    /// The end timestamp is derived from the counter rather than a wall
    /// clock, so it stays correct if the timer was ever paused.
    pub fn finish(&mut self, elapsed_seconds: u32) {
        self.duration_seconds = Some(elapsed_seconds);
        self.ended_at = Some(self.started_at + Duration::seconds(i64::from(elapsed_seconds)));
    }
}

// ============================================================================
// History Types
// ============================================================================

/// A summarized past workout, as cached for the history list
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSummary {
    pub id: Uuid,
    pub name: String,
    pub performed_at: DateTime<Utc>,
    pub duration_seconds: Option<u32>,
    pub exercise_count: u32,
    pub set_count: u32,
    pub total_volume_kg: f64,
}

impl From<&Workout> for WorkoutSummary {
    fn from(workout: &Workout) -> Self {
        WorkoutSummary {
            id: workout.id,
            name: workout.name.clone(),
            performed_at: workout.started_at,
            duration_seconds: workout.duration_seconds,
            exercise_count: workout.exercises.len() as u32,
            set_count: workout.set_count(),
            total_volume_kg: workout.total_volume_kg(),
        }
    }
}
