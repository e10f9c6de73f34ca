//! CSV export of workout history.
//!
//! One row per set, flattened for spreadsheets: workout columns repeat on
//! every row of that workout. The export is a full dump that replaces the
//! target file, oldest workout first.

use crate::store::WorkoutStore;
use lift_core::{Error, Result};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    workout_id: String,
    workout_name: String,
    performed_at: String,
    workout_duration_seconds: Option<u32>,
    exercise: String,
    equipment: String,
    set_number: u32,
    suggested_weight_kg: Option<f64>,
    suggested_reps: Option<u32>,
    actual_weight_kg: Option<f64>,
    actual_reps: Option<u32>,
    actual_duration_seconds: Option<u32>,
    rpe: Option<u8>,
    completed: bool,
}

/// Export every stored workout to CSV, returning the number of set rows
pub fn export_csv(store: &WorkoutStore, csv_path: &Path) -> Result<usize> {
    let workouts = store.load_workouts()?;
    if workouts.is_empty() {
        tracing::info!("No workouts to export");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut rows = 0;
    // load_workouts is newest first; spreadsheets read better chronologically
    for workout in workouts.iter().rev() {
        for exercise in &workout.exercises {
            for set in &exercise.sets {
                let row = CsvRow {
                    workout_id: workout.id.to_string(),
                    workout_name: workout.name.clone(),
                    performed_at: workout.started_at.to_rfc3339(),
                    workout_duration_seconds: workout.duration_seconds,
                    exercise: exercise.name.clone(),
                    equipment: exercise.equipment.label().to_string(),
                    set_number: set.position + 1,
                    suggested_weight_kg: set.suggested.weight_kg,
                    suggested_reps: set.suggested.reps,
                    actual_weight_kg: set.actual.weight_kg,
                    actual_reps: set.actual.reps,
                    actual_duration_seconds: set.actual.duration_seconds,
                    rpe: set.actual.rpe,
                    completed: set.completed,
                };
                writer
                    .serialize(row)
                    .map_err(|e| Error::Store(format!("CSV write failed: {}", e)))?;
                rows += 1;
            }
        }
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} set rows to {:?}", rows, csv_path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lift_core::{Equipment, Exercise, Workout};

    fn stored_workout(store: &WorkoutStore, day: u32, sets: usize) -> Workout {
        let mut workout = Workout::new(Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap());
        workout.name = format!("Day {}", day);
        let mut exercise = Exercise::new(workout.id, "Deadlift", Equipment::Barbell);
        for _ in 0..sets {
            let set_id = exercise.add_set();
            if let Some(set) = exercise.set_mut(set_id) {
                set.actual.weight_kg = Some(120.0);
                set.actual.reps = Some(5);
                set.completed = true;
            }
        }
        workout.exercises.push(exercise);
        store.save(&workout).unwrap();
        workout
    }

    #[test]
    fn test_export_writes_one_row_per_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(temp_dir.path());
        stored_workout(&store, 3, 2);
        stored_workout(&store, 14, 3);
        let csv_path = temp_dir.path().join("export.csv");

        let rows = export_csv(&store, &csv_path).unwrap();
        assert_eq!(rows, 5);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert!(headers.iter().any(|h| h == "actual_weight_kg"));
        assert!(headers.iter().any(|h| h == "set_number"));

        let records: Vec<_> = reader.into_records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(records.len(), 5);
        // oldest workout first
        let name_idx = headers.iter().position(|h| h == "workout_name").unwrap();
        assert_eq!(&records[0][name_idx], "Day 3");
    }

    #[test]
    fn test_export_replaces_previous_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(temp_dir.path());
        stored_workout(&store, 3, 4);
        let csv_path = temp_dir.path().join("export.csv");

        export_csv(&store, &csv_path).unwrap();
        let rows = export_csv(&store, &csv_path).unwrap();
        assert_eq!(rows, 4);

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 4);
    }

    #[test]
    fn test_empty_store_exports_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(temp_dir.path());
        let csv_path = temp_dir.path().join("export.csv");

        assert_eq!(export_csv(&store, &csv_path).unwrap(), 0);
        assert!(!csv_path.exists());
    }
}
