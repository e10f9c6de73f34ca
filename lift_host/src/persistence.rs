//! Durable persistence executor with a tiered save policy.
//!
//! A workout save gets three chances before the host reports failure:
//! 1. Direct write to the primary store
//! 2. One retry after a short pause, for transient contention
//! 3. A write into the fallback directory, reported as SavedToFallback
//!
//! Fallback copies are promoted back into the primary store by
//! [`PersistenceExecutor::sweep_fallback`], which runs at boot, after
//! every successful save, and on every runtime pump cycle, so a
//! SavedToFallback workout reaches the real store as soon as it recovers.
//! The core never sees these tiers; it only receives the final outcome.

use crate::store::{read_json, write_json_atomic, WorkoutStore};
use lift_core::{PersistenceOp, PersistenceOutcome, Result, Workout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

pub struct PersistenceExecutor {
    store: WorkoutStore,
    fallback_dir: PathBuf,
    retry_delay: Duration,
}

impl PersistenceExecutor {
    pub fn new(data_dir: &Path, retry_delay: Duration) -> Self {
        Self {
            store: WorkoutStore::new(data_dir),
            fallback_dir: data_dir.join("fallback"),
            retry_delay,
        }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    /// Execute one persistence operation on behalf of the core
    pub fn execute(&self, op: PersistenceOp) -> PersistenceOutcome {
        match op {
            PersistenceOp::SaveWorkout { workout } => self.save_with_retry(&workout),
            PersistenceOp::LoadAllWorkouts => match self.store.load_summaries() {
                Ok(workouts) => PersistenceOutcome::Summaries { workouts },
                Err(e) => PersistenceOutcome::Failed {
                    message: format!("could not load history: {}", e),
                },
            },
            PersistenceOp::LoadWorkoutById { workout_id } => match self.store.load(workout_id) {
                Ok(workout) => PersistenceOutcome::Loaded { workout },
                Err(e) => PersistenceOutcome::Failed {
                    message: format!("could not load workout: {}", e),
                },
            },
            PersistenceOp::DeleteWorkout { workout_id } => match self.store.delete(workout_id) {
                Ok(_) => PersistenceOutcome::Deleted,
                Err(e) => PersistenceOutcome::Failed {
                    message: format!("could not delete workout: {}", e),
                },
            },
        }
    }

    fn save_with_retry(&self, workout: &Workout) -> PersistenceOutcome {
        let first = match self.store.save(workout) {
            Ok(()) => {
                self.try_sweep();
                return PersistenceOutcome::Saved;
            }
            Err(e) => e,
        };
        warn!(workout_id = %workout.id, "save failed, retrying shortly: {}", first);

        std::thread::sleep(self.retry_delay);
        let second = match self.store.save(workout) {
            Ok(()) => {
                self.try_sweep();
                return PersistenceOutcome::Saved;
            }
            Err(e) => e,
        };
        warn!(workout_id = %workout.id, "retry failed, falling back: {}", second);

        match write_json_atomic(&self.fallback_path(workout.id), workout) {
            Ok(()) => {
                info!(workout_id = %workout.id, "workout saved to fallback storage");
                PersistenceOutcome::SavedToFallback
            }
            Err(third) => PersistenceOutcome::Failed {
                message: format!("could not save workout: {}", third),
            },
        }
    }

    fn fallback_path(&self, id: Uuid) -> PathBuf {
        self.fallback_dir.join(format!("{}.json", id))
    }

    /// Promote fallback copies into the primary store
    ///
    /// A copy that still cannot be saved is left in place for the next
    /// sweep; an unreadable copy is left for manual recovery.
    pub fn sweep_fallback(&self) -> Result<usize> {
        if !self.fallback_dir.exists() {
            return Ok(0);
        }

        let mut promoted = 0;
        for entry in std::fs::read_dir(&self.fallback_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            match read_json::<Workout>(&path) {
                Ok(Some(workout)) => {
                    if let Err(e) = self.store.save(&workout) {
                        warn!("Cannot promote fallback copy {:?} yet: {}", path, e);
                        continue;
                    }
                    if let Err(e) = std::fs::remove_file(&path) {
                        // the primary copy exists now; a re-promotion is a no-op
                        warn!("Promoted {:?} but could not remove it: {}", path, e);
                    }
                    promoted += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping unreadable fallback copy {:?}: {}", path, e);
                }
            }
        }

        if promoted > 0 {
            info!("Promoted {} workout(s) from fallback storage", promoted);
        }
        Ok(promoted)
    }

    /// Sweep, downgrading a sweep failure to a warning
    pub(crate) fn try_sweep(&self) {
        if let Err(e) = self.sweep_fallback() {
            warn!("Fallback sweep failed: {}", e);
        }
    }
}
