use clap::{Parser, Subcommand};
use lift_core::view::{format_elapsed, format_set_values};
use lift_core::*;
use lift_host::{export_csv, HostRuntime, WorkoutStore};
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "replog")]
#[command(about = "Workout logger with a crash-safe session engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or resume an interactive workout session (default)
    Session,

    /// List finished workouts, newest first
    History,

    /// Show one workout from the history listing
    Show {
        /// Row number from `replog history` (1 = most recent)
        index: usize,
    },

    /// Delete one workout from the history listing
    Delete {
        /// Row number from `replog history` (1 = most recent)
        index: usize,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export all finished workouts to a CSV file
    Export {
        /// Output path for the CSV file
        #[arg(default_value = "replog_export.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    lift_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }

    match cli.command {
        Some(Commands::Session) | None => cmd_session(&config),
        Some(Commands::History) => cmd_history(&config),
        Some(Commands::Show { index }) => cmd_show(&config, index),
        Some(Commands::Delete { index, yes }) => cmd_delete(&config, index, yes),
        Some(Commands::Export { output }) => cmd_export(&config, &output),
    }
}

// ============================================================================
// Interactive Session
// ============================================================================

fn cmd_session(config: &Config) -> Result<()> {
    let mut runtime = HostRuntime::new(config)?;
    runtime.launch();

    if runtime.model().current_workout.is_some() {
        println!("\nResuming the workout from your last session.");
    } else {
        runtime.dispatch(Event::StartWorkout {
            at: chrono::Utc::now(),
        });
        println!("\nStarted a new workout.");
    }

    display_help();

    loop {
        runtime.pump();
        if runtime.take_render() {
            display_session(&runtime.view());
        }

        let Some(line) = prompt_line("> ")? else {
            // stdin closed; keep the snapshot so the session resumes
            runtime.dispatch(Event::CommitEdits);
            println!("\nWorkout kept - it will resume on the next launch.");
            break;
        };

        match parse_action(&line) {
            SessionAction::Nothing => {}
            SessionAction::Help => display_help(),
            SessionAction::AddExercise => {
                if let Some((name, equipment)) = prompt_exercise()? {
                    runtime.dispatch(Event::AddExercise { name, equipment });
                }
            }
            SessionAction::DeleteExercise(number) => {
                match resolve_exercise(&runtime.view(), number) {
                    Some(exercise_id) => runtime.dispatch(Event::DeleteExercise { exercise_id }),
                    None => println!("No exercise {} in the list.", number),
                }
            }
            SessionAction::MoveExercise(from, to) => {
                match (from.checked_sub(1), to.checked_sub(1)) {
                    (Some(from), Some(to)) => {
                        runtime.dispatch(Event::MoveExercise { from, to })
                    }
                    _ => println!("Positions are numbered from 1."),
                }
            }
            SessionAction::AddSet(number) => match resolve_exercise(&runtime.view(), number) {
                Some(exercise_id) => runtime.dispatch(Event::AddSet { exercise_id }),
                None => println!("No exercise {} in the list.", number),
            },
            SessionAction::DeleteSet(exercise, set) => {
                match resolve_set(&runtime.view(), exercise, set) {
                    Some((exercise_id, set_id)) => {
                        runtime.dispatch(Event::DeleteSet { exercise_id, set_id })
                    }
                    None => println!("No set {} under exercise {}.", set, exercise),
                }
            }
            SessionAction::EditTarget(exercise, set) => {
                match resolve_set(&runtime.view(), exercise, set) {
                    Some((exercise_id, set_id)) => {
                        let patch = prompt_patch()?;
                        if patch == SetPatch::default() {
                            println!("Nothing entered - target unchanged.");
                        } else {
                            runtime.dispatch(Event::UpdateSetSuggested {
                                exercise_id,
                                set_id,
                                patch,
                            });
                        }
                    }
                    None => println!("No set {} under exercise {}.", set, exercise),
                }
            }
            SessionAction::LogSet(exercise, set) => {
                match resolve_set(&runtime.view(), exercise, set) {
                    Some((exercise_id, set_id)) => {
                        let patch = prompt_patch()?;
                        if patch == SetPatch::default() {
                            println!("Nothing entered - set unchanged.");
                        } else {
                            runtime.dispatch(Event::UpdateSetActual {
                                exercise_id,
                                set_id,
                                patch,
                            });
                        }
                    }
                    None => println!("No set {} under exercise {}.", set, exercise),
                }
            }
            SessionAction::ToggleSet(exercise, set) => {
                match resolve_set(&runtime.view(), exercise, set) {
                    Some((exercise_id, set_id)) => {
                        runtime.dispatch(Event::ToggleSetCompleted { exercise_id, set_id })
                    }
                    None => println!("No set {} under exercise {}.", set, exercise),
                }
            }
            SessionAction::Rename => {
                if let Some(name) = prompt_line("New workout name: ")? {
                    runtime.dispatch(Event::UpdateWorkoutName { name });
                }
            }
            SessionAction::Note => {
                if let Some(note) = prompt_line("Note: ")? {
                    runtime.dispatch(Event::UpdateWorkoutNote { note });
                }
            }
            SessionAction::Finish => {
                runtime.dispatch(Event::CommitEdits);
                runtime.dispatch(Event::FinishWorkout);
                match runtime.view().error {
                    Some(error) => println!("\n⚠ {}", error),
                    None => println!("\n✓ Workout saved!"),
                }
                break;
            }
            SessionAction::Discard => {
                if confirm("Discard this workout and lose everything entered?")? {
                    runtime.dispatch(Event::DiscardWorkout);
                    println!("\nWorkout discarded.");
                    break;
                }
            }
            SessionAction::Quit => {
                runtime.dispatch(Event::CommitEdits);
                println!("\nWorkout kept - it will resume on the next launch.");
                break;
            }
            SessionAction::Unknown(input) => {
                println!("Unknown command '{}'. Type '?' for help.", input);
            }
        }
    }

    Ok(())
}

enum SessionAction {
    AddExercise,
    DeleteExercise(usize),
    MoveExercise(usize, usize),
    AddSet(usize),
    DeleteSet(usize, usize),
    EditTarget(usize, usize),
    LogSet(usize, usize),
    ToggleSet(usize, usize),
    Rename,
    Note,
    Finish,
    Discard,
    Quit,
    Help,
    Nothing,
    Unknown(String),
}

fn parse_action(line: &str) -> SessionAction {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return SessionAction::Nothing;
    };
    let first = parts.next().and_then(|p| p.parse::<usize>().ok());
    let second = parts.next().and_then(|p| p.parse::<usize>().ok());

    match (command.to_lowercase().as_str(), first, second) {
        ("a", _, _) => SessionAction::AddExercise,
        ("d", Some(exercise), None) => SessionAction::DeleteExercise(exercise),
        ("m", Some(from), Some(to)) => SessionAction::MoveExercise(from, to),
        ("s", Some(exercise), None) => SessionAction::AddSet(exercise),
        ("ds", Some(exercise), Some(set)) => SessionAction::DeleteSet(exercise, set),
        ("t", Some(exercise), Some(set)) => SessionAction::EditTarget(exercise, set),
        ("l", Some(exercise), Some(set)) => SessionAction::LogSet(exercise, set),
        ("c", Some(exercise), Some(set)) => SessionAction::ToggleSet(exercise, set),
        ("r", _, _) => SessionAction::Rename,
        ("o", _, _) => SessionAction::Note,
        ("f", _, _) => SessionAction::Finish,
        ("x", _, _) => SessionAction::Discard,
        ("q", _, _) => SessionAction::Quit,
        ("?" | "h" | "help", _, _) => SessionAction::Help,
        _ => SessionAction::Unknown(line.to_string()),
    }
}

fn resolve_exercise(vm: &ViewModel, number: usize) -> Option<Uuid> {
    let workout = vm.workout.as_ref()?;
    let exercise = workout.exercises.get(number.checked_sub(1)?)?;
    Some(exercise.id)
}

fn resolve_set(vm: &ViewModel, exercise: usize, set: usize) -> Option<(Uuid, Uuid)> {
    let workout = vm.workout.as_ref()?;
    let exercise = workout.exercises.get(exercise.checked_sub(1)?)?;
    let set = exercise.sets.get(set.checked_sub(1)?)?;
    Some((exercise.id, set.id))
}

fn display_session(vm: &ViewModel) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    match &vm.workout {
        Some(workout) => {
            println!("│  {}", workout.name);
            println!("│  elapsed {} · {}", vm.timer, workout.set_summary);
        }
        None => println!("│  No workout in progress"),
    }
    println!("╰─────────────────────────────────────────╯");

    if let Some(workout) = &vm.workout {
        if workout.exercises.is_empty() {
            println!("  (no exercises yet; 'a' adds one)");
        }
        for (i, exercise) in workout.exercises.iter().enumerate() {
            println!();
            println!("  {}. {} · {}", i + 1, exercise.name, exercise.equipment);
            for set in &exercise.sets {
                let mark = if set.completed { "✓" } else { "·" };
                println!(
                    "     {} set {}  target {}  actual {}",
                    mark, set.number, set.suggested, set.actual
                );
            }
        }
        if !workout.note.is_empty() {
            println!();
            println!("  note: {}", workout.note);
        }
    }

    if let Some(error) = &vm.error {
        println!();
        println!("  ⚠ {}", error);
    }
    println!();
}

fn display_help() {
    println!("─────────────────────────────────────────");
    println!("  a        add an exercise");
    println!("  s N      add a set to exercise N");
    println!("  t N M    edit the target for set M of exercise N");
    println!("  l N M    log what you lifted for set M of exercise N");
    println!("  c N M    mark set M of exercise N done (or undo it)");
    println!("  ds N M   delete set M of exercise N");
    println!("  d N      delete exercise N");
    println!("  m N M    swap exercises N and M");
    println!("  r / o    rename the workout / edit its note");
    println!("  f        finish and save the workout");
    println!("  x        discard the workout");
    println!("  q        quit; the workout resumes on the next launch");
    println!("  Enter    redraw (updates the clock)");
    println!("─────────────────────────────────────────");
}

fn prompt_exercise() -> Result<Option<(String, Equipment)>> {
    let Some(name) = prompt_line("Exercise name: ")? else {
        return Ok(None);
    };

    let menu = [
        Equipment::Barbell,
        Equipment::Dumbbell,
        Equipment::Kettlebell,
        Equipment::Machine,
        Equipment::Cable,
        Equipment::Bodyweight,
        Equipment::Band,
    ];
    let labels: Vec<String> = menu
        .iter()
        .enumerate()
        .map(|(i, equipment)| format!("{}={}", i + 1, equipment.label()))
        .collect();
    println!("  {}", labels.join("  "));

    let Some(choice) = prompt_line("Equipment [1-7, a name, or blank for bodyweight]: ")? else {
        return Ok(None);
    };
    let equipment = match choice.parse::<usize>() {
        Ok(n) if (1..=menu.len()).contains(&n) => menu[n - 1].clone(),
        _ if choice.is_empty() => Equipment::Bodyweight,
        _ => Equipment::Other(choice),
    };

    Ok(Some((name, equipment)))
}

fn prompt_patch() -> Result<SetPatch> {
    let weight = prompt_line("  Weight kg (blank to skip): ")?;
    let reps = prompt_line("  Reps (blank to skip): ")?;
    let rpe = prompt_line("  RPE 1-10 (blank to skip): ")?;

    Ok(SetPatch {
        weight_kg: weight.and_then(|w| w.parse().ok()),
        reps: reps.and_then(|r| r.parse().ok()),
        rpe: rpe.and_then(|r| r.parse().ok()),
        ..Default::default()
    })
}

fn confirm(question: &str) -> Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.as_deref(), Some("y") | Some("Y")))
}

/// Prompt and read one trimmed line; `None` means stdin is closed.
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

// ============================================================================
// One-Shot Commands
// ============================================================================

fn cmd_history(config: &Config) -> Result<()> {
    let store = WorkoutStore::new(&config.data.data_dir);
    let summaries = store.load_summaries()?;

    if summaries.is_empty() {
        println!("No finished workouts yet.");
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!(
        "│  HISTORY · {} workout{}",
        summaries.len(),
        if summaries.len() == 1 { "" } else { "s" }
    );
    println!("╰─────────────────────────────────────────╯");

    for (i, row) in summaries.iter().enumerate() {
        let duration = row
            .duration_seconds
            .map(format_elapsed)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>2}. {}  {:<24.24}  {:>8}  {} exercise{} · {} set{}",
            i + 1,
            row.performed_at.format("%d %b %Y"),
            row.name,
            duration,
            row.exercise_count,
            if row.exercise_count == 1 { "" } else { "s" },
            row.set_count,
            if row.set_count == 1 { "" } else { "s" }
        );
    }
    println!();

    Ok(())
}

fn cmd_show(config: &Config, index: usize) -> Result<()> {
    let store = WorkoutStore::new(&config.data.data_dir);
    let summaries = store.load_summaries()?;

    let Some(summary) = index.checked_sub(1).and_then(|i| summaries.get(i)) else {
        println!(
            "No workout at position {}. Run `replog history` to see the list.",
            index
        );
        return Ok(());
    };
    let Some(workout) = store.load(summary.id)? else {
        println!("That workout no longer exists.");
        return Ok(());
    };

    display_workout(&workout);
    Ok(())
}

fn display_workout(workout: &Workout) {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│  {}", workout.name);
    println!("│  {}", workout.started_at.format("%-d %b %Y %H:%M"));
    println!("╰─────────────────────────────────────────╯");
    if let Some(duration) = workout.duration_seconds {
        println!("  duration {}", format_elapsed(duration));
    }

    for exercise in &workout.exercises {
        println!();
        println!("  {} · {}", exercise.name, exercise.equipment.label());
        for set in &exercise.sets {
            let mark = if set.completed { "✓" } else { "·" };
            println!(
                "     {} set {}  target {}  actual {}",
                mark,
                set.position + 1,
                format_set_values(&set.suggested),
                format_set_values(&set.actual)
            );
        }
    }

    if let Some(note) = &workout.note {
        if !note.is_empty() {
            println!();
            println!("  note: {}", note);
        }
    }
    let volume = workout.total_volume_kg();
    if volume > 0.0 {
        println!();
        println!("  total volume {:.1} kg", volume);
    }
    println!();
}

fn cmd_delete(config: &Config, index: usize, yes: bool) -> Result<()> {
    let store = WorkoutStore::new(&config.data.data_dir);
    let summaries = store.load_summaries()?;

    let Some(summary) = index.checked_sub(1).and_then(|i| summaries.get(i)) else {
        println!(
            "No workout at position {}. Run `replog history` to see the list.",
            index
        );
        return Ok(());
    };

    if !yes {
        let question = format!(
            "Delete \"{}\" from {}? This cannot be undone.",
            summary.name,
            summary.performed_at.format("%-d %b %Y")
        );
        if !confirm(&question)? {
            println!("Nothing deleted.");
            return Ok(());
        }
    }

    if store.delete(summary.id)? {
        println!("✓ Deleted \"{}\"", summary.name);
    } else {
        println!("That workout was already gone.");
    }
    Ok(())
}

fn cmd_export(config: &Config, output: &PathBuf) -> Result<()> {
    let store = WorkoutStore::new(&config.data.data_dir);
    let count = export_csv(&store, output)?;

    if count == 0 {
        println!("No finished workouts to export.");
    } else {
        println!(
            "✓ Exported {} set row{} to CSV",
            count,
            if count == 1 { "" } else { "s" }
        );
        println!("  CSV: {}", output.display());
    }
    Ok(())
}
