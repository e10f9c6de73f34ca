//! Read-only ViewModel projection of the model.
//!
//! The shell never touches the Model; it renders the strings produced here.
//! Projection is pure and total: any model state yields a ViewModel, all
//! display formatting happens in this module, and nothing here mutates
//! anything.

use crate::model::{Model, Tab};
use crate::types::{Exercise, ExerciseSet, SetValues, Workout, WorkoutSummary};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the shell needs to draw one frame
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub workout: Option<WorkoutView>,
    /// Elapsed time of the in-progress workout, "M:SS" or "H:MM:SS"
    pub timer: String,
    pub timer_running: bool,
    pub active_tab: Tab,
    pub history: Vec<HistoryRowView>,
    pub history_detail: Option<WorkoutView>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutView {
    pub id: Uuid,
    pub name: String,
    pub note: String,
    pub exercises: Vec<ExerciseView>,
    /// e.g. "3 of 5 sets completed"
    pub set_summary: String,
    /// e.g. "1250 kg"
    pub total_volume: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseView {
    pub id: Uuid,
    pub name: String,
    pub equipment: String,
    pub sets: Vec<SetView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetView {
    pub id: Uuid,
    /// 1-based display number
    pub number: u32,
    /// e.g. "60 kg × 8", or "—" when nothing is planned
    pub suggested: String,
    pub actual: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRowView {
    pub id: Uuid,
    pub name: String,
    /// e.g. "12 Mar 2026"
    pub performed_on: String,
    /// Elapsed time, same clock format as the live timer
    pub duration: String,
    /// e.g. "2 exercises · 6 sets · 1250 kg"
    pub summary: String,
}

/// Project the model into a ViewModel
pub fn view(model: &Model) -> ViewModel {
    ViewModel {
        workout: model.current_workout.as_ref().map(workout_view),
        timer: format_elapsed(model.timer_seconds),
        timer_running: model.timer_running,
        active_tab: model.active_tab,
        history: model.history.iter().map(history_row).collect(),
        history_detail: model.history_detail.as_ref().map(workout_view),
        error: model.error.clone(),
    }
}

fn workout_view(workout: &Workout) -> WorkoutView {
    WorkoutView {
        id: workout.id,
        name: workout.name.clone(),
        note: workout.note.clone().unwrap_or_default(),
        exercises: workout.exercises.iter().map(exercise_view).collect(),
        set_summary: format!(
            "{} of {} sets completed",
            workout.completed_set_count(),
            workout.set_count()
        ),
        total_volume: format_volume(workout.total_volume_kg()),
    }
}

fn exercise_view(exercise: &Exercise) -> ExerciseView {
    ExerciseView {
        id: exercise.id,
        name: exercise.name.clone(),
        equipment: exercise.equipment.label().to_string(),
        sets: exercise.sets.iter().map(set_view).collect(),
    }
}

fn set_view(set: &ExerciseSet) -> SetView {
    SetView {
        id: set.id,
        number: set.position + 1,
        suggested: format_set_values(&set.suggested),
        actual: format_set_values(&set.actual),
        completed: set.completed,
    }
}

fn history_row(summary: &WorkoutSummary) -> HistoryRowView {
    HistoryRowView {
        id: summary.id,
        name: summary.name.clone(),
        performed_on: summary.performed_at.format("%-d %b %Y").to_string(),
        duration: summary
            .duration_seconds
            .map(format_elapsed)
            .unwrap_or_else(|| "—".to_string()),
        summary: format!(
            "{} · {} · {}",
            plural(summary.exercise_count, "exercise"),
            plural(summary.set_count, "set"),
            format_volume(summary.total_volume_kg)
        ),
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Clock-style elapsed time: "0:05", "12:34", "1:02:03"
pub fn format_elapsed(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// One line for a set's planned or performed values, "—" when empty
pub fn format_set_values(values: &SetValues) -> String {
    let mut parts = Vec::new();
    match (values.weight_kg, values.reps) {
        (Some(weight), Some(reps)) => parts.push(format!("{} kg × {}", format_number(weight), reps)),
        (Some(weight), None) => parts.push(format!("{} kg", format_number(weight))),
        (None, Some(reps)) => parts.push(format!("{} reps", reps)),
        (None, None) => {}
    }
    if let Some(duration) = values.duration_seconds {
        parts.push(format_elapsed(duration));
    }
    if let Some(rpe) = values.rpe {
        parts.push(format!("RPE {}", rpe));
    }
    if parts.is_empty() {
        "—".to_string()
    } else {
        parts.join(" · ")
    }
}

fn format_volume(kg: f64) -> String {
    format!("{} kg", format_number(kg))
}

/// Whole numbers without a decimal point, otherwise one decimal place
fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 0.05 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn plural(count: u32, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
