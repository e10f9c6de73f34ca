//! The update function: the single place app state changes.
//!
//! `update` consumes one event, mutates the model, and returns the effect
//! requests the host must execute. It runs to completion with no blocking
//! and no I/O; everything it cannot do itself comes back out as a request.
//!
//! Conventions the handlers follow:
//! - user intents clear any stale error banner before they are handled
//! - structural mutations (add/delete/move/toggle) flush the recovery
//!   snapshot immediately; text and value edits only mark it dirty and the
//!   flush rides a later timer tick or an explicit CommitEdits
//! - a Render request is appended after the capability requests whenever
//!   the event changed the model, so the shell pulls exactly one fresh view
//! - responses with unknown correlation ids are discarded without touching
//!   the model

use crate::correlator::{CapabilityKind, EffectTracker};
use crate::effect::{
    EffectOp, EffectRequest, PersistenceOp, PersistenceOutcome, SnapshotOp, SnapshotOutcome,
    TimerOp, TimerOutcome,
};
use crate::event::{Event, SetPatch};
use crate::model::{Model, Tab};
use crate::types::{Equipment, Exercise, ExerciseSet, Workout};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Process one event against the model, producing effect requests
pub fn update(event: Event, model: &mut Model, tracker: &mut EffectTracker) -> Vec<EffectRequest> {
    let mut effects = Vec::new();
    let mut changed = false;

    if event.is_user_intent() && model.error.is_some() {
        model.error = None;
        changed = true;
    }

    changed |= match event {
        // Lifecycle
        Event::Launched => {
            info!("core launched, requesting recovery snapshot and history");
            effects.push(tracker.request(EffectOp::Snapshot {
                op: SnapshotOp::LoadCurrent,
            }));
            effects.push(load_all_workouts(tracker));
            false
        }
        Event::StartWorkout { at } => handle_start_workout(model, tracker, &mut effects, at),
        Event::FinishWorkout => handle_finish_workout(model, tracker, &mut effects),
        Event::DiscardWorkout => handle_discard_workout(model, tracker, &mut effects),

        // Exercises
        Event::AddExercise { name, equipment } => {
            handle_add_exercise(model, tracker, &mut effects, name, equipment)
        }
        Event::DeleteExercise { exercise_id } => {
            handle_delete_exercise(model, tracker, &mut effects, exercise_id)
        }
        Event::MoveExercise { from, to } => {
            handle_move_exercise(model, tracker, &mut effects, from, to)
        }

        // Sets
        Event::AddSet { exercise_id } => handle_add_set(model, tracker, &mut effects, exercise_id),
        Event::DeleteSet {
            exercise_id,
            set_id,
        } => handle_delete_set(model, tracker, &mut effects, exercise_id, set_id),
        Event::UpdateSetSuggested {
            exercise_id,
            set_id,
            patch,
        } => handle_update_set(model, exercise_id, set_id, &patch, SetSide::Suggested),
        Event::UpdateSetActual {
            exercise_id,
            set_id,
            patch,
        } => handle_update_set(model, exercise_id, set_id, &patch, SetSide::Actual),
        Event::ToggleSetCompleted {
            exercise_id,
            set_id,
        } => handle_toggle_set(model, tracker, &mut effects, exercise_id, set_id),

        // Workout metadata
        Event::UpdateWorkoutName { name } => handle_update_workout_name(model, name),
        Event::UpdateWorkoutNote { note } => handle_update_workout_note(model, note),
        Event::CommitEdits => {
            if model.snapshot_dirty {
                flush_snapshot(model, tracker, &mut effects);
            }
            false
        }

        // Navigation and history
        Event::ChangeTab { tab } => handle_change_tab(model, tracker, &mut effects, tab),
        Event::RefreshHistory => {
            effects.push(load_all_workouts(tracker));
            false
        }
        Event::SelectHistoryWorkout { workout_id } => {
            effects.push(tracker.request(EffectOp::Persistence {
                op: PersistenceOp::LoadWorkoutById { workout_id },
            }));
            false
        }
        Event::DeleteHistoryWorkout { workout_id } => {
            handle_delete_history_workout(model, tracker, &mut effects, workout_id)
        }

        // Host responses consume their correlation id before they act
        Event::PersistenceResponded { request, outcome } => {
            if !tracker.resolve(request, CapabilityKind::Persistence) {
                return effects;
            }
            handle_persistence_outcome(model, tracker, &mut effects, outcome)
        }
        Event::SnapshotResponded { request, outcome } => {
            if !tracker.resolve(request, CapabilityKind::Snapshot) {
                return effects;
            }
            handle_snapshot_outcome(model, tracker, &mut effects, outcome)
        }
        Event::TimerResponded { request, outcome } => {
            if !tracker.resolve(request, CapabilityKind::Timer) {
                return effects;
            }
            handle_timer_outcome(model, tracker, &mut effects, outcome)
        }
    };

    if changed {
        effects.push(tracker.request(EffectOp::Render));
    }
    effects
}

// ============================================================================
// Active Workout
// ============================================================================

fn handle_start_workout(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    at: DateTime<Utc>,
) -> bool {
    if model.current_workout.is_some() {
        model.set_error("A workout is already in progress");
        return true;
    }
    let workout = Workout::new(at);
    info!(workout_id = %workout.id, "starting workout");
    model.current_workout = Some(workout);
    model.timer_seconds = 0;
    model.tick_count = 0;
    model.timer_running = true;
    model.snapshot_dirty = false;
    model.active_tab = Tab::Workout;

    let start = tracker.request(EffectOp::Timer { op: TimerOp::Start });
    model.timer_request = Some(start.id);
    effects.push(start);
    // initial snapshot, so a crash right after starting still recovers
    flush_snapshot(model, tracker, effects);
    true
}

fn handle_finish_workout(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
) -> bool {
    let mut workout = match model.current_workout.take() {
        Some(workout) => workout,
        None => {
            model.set_error("No workout is in progress");
            return true;
        }
    };
    workout.finish(model.timer_seconds);
    info!(
        workout_id = %workout.id,
        duration_seconds = model.timer_seconds,
        sets = workout.completed_set_count(),
        "finishing workout"
    );
    stop_timer(model, tracker, effects);
    effects.push(tracker.request(EffectOp::Persistence {
        op: PersistenceOp::SaveWorkout { workout },
    }));
    effects.push(tracker.request(EffectOp::Snapshot {
        op: SnapshotOp::DeleteCurrent,
    }));
    model.timer_seconds = 0;
    model.tick_count = 0;
    model.snapshot_dirty = false;
    true
}

fn handle_discard_workout(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
) -> bool {
    let workout = match model.current_workout.take() {
        Some(workout) => workout,
        None => {
            model.set_error("No workout is in progress");
            return true;
        }
    };
    info!(workout_id = %workout.id, "discarding workout");
    stop_timer(model, tracker, effects);
    effects.push(tracker.request(EffectOp::Snapshot {
        op: SnapshotOp::DeleteCurrent,
    }));
    model.timer_seconds = 0;
    model.tick_count = 0;
    model.snapshot_dirty = false;
    true
}

// ============================================================================
// Exercises
// ============================================================================

fn handle_add_exercise(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    name: String,
    equipment: Equipment,
) -> bool {
    let name = name.trim().to_string();
    if name.is_empty() {
        model.set_error("Exercise name cannot be empty");
        return true;
    }
    {
        let workout = match model.workout_mut_or_error() {
            Some(workout) => workout,
            None => return true,
        };
        let exercise = Exercise::new(workout.id, name, equipment);
        debug!(exercise_id = %exercise.id, name = %exercise.name, "adding exercise");
        workout.exercises.push(exercise);
    }
    flush_snapshot(model, tracker, effects);
    true
}

fn handle_delete_exercise(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    exercise_id: Uuid,
) -> bool {
    let removed = {
        let workout = match model.workout_mut_or_error() {
            Some(workout) => workout,
            None => return true,
        };
        let before = workout.exercises.len();
        workout.exercises.retain(|exercise| exercise.id != exercise_id);
        workout.exercises.len() != before
    };
    if removed {
        debug!(%exercise_id, "deleted exercise");
        flush_snapshot(model, tracker, effects);
    } else {
        model.set_error("Exercise not found");
    }
    true
}

fn handle_move_exercise(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    from: usize,
    to: usize,
) -> bool {
    let moved: Result<bool, &str> = {
        let workout = match model.workout_mut_or_error() {
            Some(workout) => workout,
            None => return true,
        };
        let len = workout.exercises.len();
        if from >= len || to >= len {
            Err("Cannot move exercise: position out of range")
        } else if from == to {
            Ok(false)
        } else {
            workout.exercises.swap(from, to);
            Ok(true)
        }
    };
    match moved {
        Ok(true) => {
            flush_snapshot(model, tracker, effects);
            true
        }
        Ok(false) => false,
        Err(message) => {
            model.set_error(message);
            true
        }
    }
}

// ============================================================================
// Sets
// ============================================================================

#[derive(Clone, Copy)]
enum SetSide {
    Suggested,
    Actual,
}

/// Outcome of locating a set for mutation
enum SetEdit {
    Applied { changed: bool },
    NoWorkout,
    NoExercise,
    NoSet,
}

fn edit_set(
    model: &mut Model,
    exercise_id: Uuid,
    set_id: Uuid,
    edit: impl FnOnce(&mut ExerciseSet) -> bool,
) -> SetEdit {
    let workout = match model.current_workout.as_mut() {
        Some(workout) => workout,
        None => return SetEdit::NoWorkout,
    };
    let exercise = match workout.exercise_mut(exercise_id) {
        Some(exercise) => exercise,
        None => return SetEdit::NoExercise,
    };
    let set = match exercise.set_mut(set_id) {
        Some(set) => set,
        None => return SetEdit::NoSet,
    };
    SetEdit::Applied { changed: edit(set) }
}

fn report_missing(model: &mut Model, missing: SetEdit) -> bool {
    match missing {
        SetEdit::NoWorkout => model.set_error("No workout is in progress"),
        SetEdit::NoExercise => model.set_error("Exercise not found"),
        SetEdit::NoSet => model.set_error("Set not found"),
        SetEdit::Applied { .. } => {}
    }
    true
}

fn handle_add_set(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    exercise_id: Uuid,
) -> bool {
    let result = match model.current_workout.as_mut() {
        None => SetEdit::NoWorkout,
        Some(workout) => match workout.exercise_mut(exercise_id) {
            None => SetEdit::NoExercise,
            Some(exercise) => {
                let set_id = exercise.add_set();
                debug!(%exercise_id, %set_id, "added set");
                SetEdit::Applied { changed: true }
            }
        },
    };
    match result {
        SetEdit::Applied { .. } => {
            flush_snapshot(model, tracker, effects);
            true
        }
        missing => report_missing(model, missing),
    }
}

fn handle_delete_set(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    exercise_id: Uuid,
    set_id: Uuid,
) -> bool {
    let result = match model.current_workout.as_mut() {
        None => SetEdit::NoWorkout,
        Some(workout) => match workout.exercise_mut(exercise_id) {
            None => SetEdit::NoExercise,
            Some(exercise) => {
                if exercise.remove_set(set_id) {
                    SetEdit::Applied { changed: true }
                } else {
                    SetEdit::NoSet
                }
            }
        },
    };
    match result {
        SetEdit::Applied { .. } => {
            debug!(%exercise_id, %set_id, "deleted set");
            flush_snapshot(model, tracker, effects);
            true
        }
        missing => report_missing(model, missing),
    }
}

fn handle_update_set(
    model: &mut Model,
    exercise_id: Uuid,
    set_id: Uuid,
    patch: &SetPatch,
    side: SetSide,
) -> bool {
    let result = edit_set(model, exercise_id, set_id, |set| match side {
        SetSide::Suggested => patch.apply(&mut set.suggested),
        SetSide::Actual => patch.apply(&mut set.actual),
    });
    match result {
        SetEdit::Applied { changed } => {
            if changed {
                model.snapshot_dirty = true;
            }
            changed
        }
        missing => report_missing(model, missing),
    }
}

fn handle_toggle_set(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    exercise_id: Uuid,
    set_id: Uuid,
) -> bool {
    let result = edit_set(model, exercise_id, set_id, |set| {
        set.completed = !set.completed;
        true
    });
    match result {
        SetEdit::Applied { .. } => {
            flush_snapshot(model, tracker, effects);
            true
        }
        missing => report_missing(model, missing),
    }
}

// ============================================================================
// Workout Metadata
// ============================================================================

fn handle_update_workout_name(model: &mut Model, name: String) -> bool {
    let name = name.trim().to_string();
    if name.is_empty() {
        model.set_error("Workout name cannot be empty");
        return true;
    }
    let workout = match model.workout_mut_or_error() {
        Some(workout) => workout,
        None => return true,
    };
    workout.name = name;
    model.snapshot_dirty = true;
    true
}

fn handle_update_workout_note(model: &mut Model, note: String) -> bool {
    let workout = match model.workout_mut_or_error() {
        Some(workout) => workout,
        None => return true,
    };
    // an empty note clears the field rather than storing ""
    workout.note = if note.is_empty() { None } else { Some(note) };
    model.snapshot_dirty = true;
    true
}

// ============================================================================
// Navigation and History
// ============================================================================

fn handle_change_tab(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    tab: Tab,
) -> bool {
    if model.active_tab == tab {
        return false;
    }
    model.active_tab = tab;
    if tab == Tab::History {
        // fresh list on entry, back at the list level
        model.history_detail = None;
        effects.push(load_all_workouts(tracker));
    }
    true
}

fn handle_delete_history_workout(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    workout_id: Uuid,
) -> bool {
    // optimistic removal; the Deleted response triggers a reconciling reload
    model.history.retain(|summary| summary.id != workout_id);
    if model
        .history_detail
        .as_ref()
        .is_some_and(|workout| workout.id == workout_id)
    {
        model.history_detail = None;
    }
    info!(%workout_id, "deleting workout from history");
    effects.push(tracker.request(EffectOp::Persistence {
        op: PersistenceOp::DeleteWorkout { workout_id },
    }));
    true
}

// ============================================================================
// Host Responses
// ============================================================================

fn handle_persistence_outcome(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    outcome: PersistenceOutcome,
) -> bool {
    match outcome {
        PersistenceOutcome::Saved => {
            info!("workout saved to history");
            effects.push(load_all_workouts(tracker));
            false
        }
        PersistenceOutcome::SavedToFallback => {
            warn!("workout saved to fallback storage; primary store unavailable");
            effects.push(load_all_workouts(tracker));
            false
        }
        PersistenceOutcome::Summaries { mut workouts } => {
            workouts.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
            model.history = workouts;
            true
        }
        PersistenceOutcome::Loaded {
            workout: Some(workout),
        } => {
            model.history_detail = Some(workout);
            true
        }
        PersistenceOutcome::Loaded { workout: None } => {
            model.history_detail = None;
            model.set_error("That workout no longer exists");
            effects.push(load_all_workouts(tracker));
            true
        }
        PersistenceOutcome::Deleted => {
            effects.push(load_all_workouts(tracker));
            false
        }
        PersistenceOutcome::Failed { message } => {
            warn!(%message, "persistence operation failed");
            model.set_error(message);
            true
        }
    }
}

fn handle_snapshot_outcome(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    outcome: SnapshotOutcome,
) -> bool {
    match outcome {
        SnapshotOutcome::Ok => false,
        SnapshotOutcome::Loaded {
            workout: Some(workout),
        } => {
            if model.current_workout.is_some() {
                warn!("ignoring recovery snapshot, a workout is already active");
                return false;
            }
            let elapsed = workout.duration_seconds.unwrap_or(0);
            info!(workout_id = %workout.id, elapsed, "recovered in-progress workout");
            model.timer_seconds = elapsed;
            model.tick_count = 0;
            model.timer_running = true;
            model.snapshot_dirty = false;
            model.active_tab = Tab::Workout;
            model.current_workout = Some(workout);
            let start = tracker.request(EffectOp::Timer { op: TimerOp::Start });
            model.timer_request = Some(start.id);
            effects.push(start);
            true
        }
        SnapshotOutcome::Loaded { workout: None } => {
            debug!("no recovery snapshot present");
            false
        }
        SnapshotOutcome::Failed { message } => {
            // recovery data is best-effort; never worth an error banner
            warn!(%message, "snapshot operation failed");
            false
        }
    }
}

fn handle_timer_outcome(
    model: &mut Model,
    tracker: &mut EffectTracker,
    effects: &mut Vec<EffectRequest>,
    outcome: TimerOutcome,
) -> bool {
    match outcome {
        TimerOutcome::Tick => {
            model.tick_count += 1;
            model.timer_seconds = model.timer_seconds.saturating_add(1);
            let every = u64::from(model.snapshot_every_ticks.max(1));
            if model.snapshot_dirty && model.tick_count % every == 0 {
                flush_snapshot(model, tracker, effects);
            }
            true
        }
        TimerOutcome::Stopped => {
            debug!("timer stop acknowledged");
            false
        }
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

fn load_all_workouts(tracker: &mut EffectTracker) -> EffectRequest {
    tracker.request(EffectOp::Persistence {
        op: PersistenceOp::LoadAllWorkouts,
    })
}

/// Save the in-progress workout to the recovery snapshot, stamping the
/// elapsed seconds so recovery can resume the clock
fn flush_snapshot(model: &mut Model, tracker: &mut EffectTracker, effects: &mut Vec<EffectRequest>) {
    let snapshot = match model.current_workout.as_mut() {
        Some(workout) => {
            workout.duration_seconds = Some(model.timer_seconds);
            workout.clone()
        }
        None => return,
    };
    model.snapshot_dirty = false;
    effects.push(tracker.request(EffectOp::Snapshot {
        op: SnapshotOp::SaveCurrent { workout: snapshot },
    }));
}

/// Retire the tick stream and ask the host to stop the timer
///
/// The stream id leaves the in-flight table before the stop request is
/// issued, so any tick already in transit resolves as unknown and dies.
fn stop_timer(model: &mut Model, tracker: &mut EffectTracker, effects: &mut Vec<EffectRequest>) {
    if let Some(stream) = model.timer_request.take() {
        tracker.retire(stream);
        effects.push(tracker.request(EffectOp::Timer { op: TimerOp::Stop }));
    }
    model.timer_running = false;
}
