//! Integration tests for the replog binary.
//!
//! These tests verify end-to-end behavior including:
//! - The interactive session workflow
//! - Session resume through the recovery snapshot
//! - History listing, detail view, and deletion
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("replog"))
}

/// Count saved workout files under `<data_dir>/workouts`
fn workout_files(data_dir: &Path) -> usize {
    match fs::read_dir(data_dir.join("workouts")) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".json"))
            .count(),
        Err(_) => 0,
    }
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout logger with a crash-safe session engine",
        ));
}

#[test]
fn test_default_command_is_session() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Started a new workout"));
}

#[test]
fn test_finish_saves_workout_to_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Add a barbell exercise, log one set at 100 kg x 8, complete it,
    // rename the workout, then finish
    let script = "a\nBench Press\n1\ns 1\nl 1 1\n100\n8\n\nc 1 1\nr\nMorning Push\nf\n";

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved"));

    // One workout on disk and the recovery slot is cleared
    assert_eq!(workout_files(&data_dir), 1);
    assert!(!data_dir.join("current.json").exists());

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning Push"))
        .stdout(predicate::str::contains("1 exercise"));
}

#[test]
fn test_show_displays_logged_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let script = "a\nBench Press\n1\ns 1\nl 1 1\n100\n8\n\nf\n";
    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(script)
        .assert()
        .success();

    cli()
        .arg("show")
        .arg("1")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("100 kg × 8"));
}

#[test]
fn test_quit_keeps_snapshot_and_resumes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nSquat\n1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("resume"));

    // Nothing reached the history store, but the slot survives
    assert!(data_dir.join("current.json").exists());
    assert_eq!(workout_files(&data_dir), 0);

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming the workout"))
        .stdout(predicate::str::contains("Squat"));
}

#[test]
fn test_discard_leaves_no_trace() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nRow\n2\nx\ny\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout discarded"));

    assert!(!data_dir.join("current.json").exists());
    assert_eq!(workout_files(&data_dir), 0);
}

#[test]
fn test_move_exercise_reorders_board() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Two exercises, then swap them; the redraw shows Squat in slot 2
    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nSquat\n1\na\nBench Press\n1\nm 1 2\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2. Squat"));
}

#[test]
fn test_edit_target_shows_on_board() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nOverhead Press\n1\ns 1\nt 1 1\n40\n5\n\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("target 40 kg × 5"));
}

#[test]
fn test_empty_exercise_name_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\n\n\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise name cannot be empty"));
}

#[test]
fn test_unknown_command_hint() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("zzz\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'zzz'"));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No finished workouts yet"));
}

#[test]
fn test_show_out_of_range() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("show")
        .arg("5")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workout at position 5"));
}

#[test]
fn test_delete_removes_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nDeadlift\n1\nf\n")
        .assert()
        .success();
    assert_eq!(workout_files(&data_dir), 1);

    cli()
        .arg("delete")
        .arg("1")
        .arg("--yes")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    assert_eq!(workout_files(&data_dir), 0);

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No finished workouts yet"));
}

#[test]
fn test_delete_requires_confirmation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nDeadlift\n1\nf\n")
        .assert()
        .success();

    // Declining the prompt leaves the workout in place
    cli()
        .arg("delete")
        .arg("1")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing deleted"));

    assert_eq!(workout_files(&data_dir), 1);
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("session")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("a\nBench Press\n1\ns 1\nl 1 1\n60\n5\n\nf\n")
        .assert()
        .success();

    let csv_path = data_dir.join("export.csv");
    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(content.contains("workout_id"));
    assert!(content.contains("Bench Press"));
}

#[test]
fn test_export_with_no_workouts() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("export.csv");

    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No finished workouts to export"));

    assert!(!csv_path.exists());
}
