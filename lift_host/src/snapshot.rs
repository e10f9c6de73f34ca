//! Single-slot recovery snapshot storage.
//!
//! The in-progress workout lives at `<data_dir>/current.json` between the
//! debounced saves the core requests. Recovery is best-effort: a snapshot
//! that cannot be read is logged and treated as absent, never as a fatal
//! error, because losing a recovery copy must not block a fresh session.

use crate::store::{read_json, write_json_atomic};
use lift_core::{Result, SnapshotOp, SnapshotOutcome, Workout};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("current.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, workout: &Workout) -> Result<()> {
        write_json_atomic(&self.path, workout)?;
        tracing::debug!(workout_id = %workout.id, "saved recovery snapshot");
        Ok(())
    }

    /// Load the snapshot; unreadable or corrupt slots count as empty
    pub fn load(&self) -> Result<Option<Workout>> {
        match read_json::<Workout>(&self.path) {
            Ok(workout) => Ok(workout),
            Err(e) => {
                tracing::warn!("Ignoring unreadable snapshot {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    pub fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("cleared recovery snapshot");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Execute one snapshot operation on behalf of the core
    pub fn execute(&self, op: SnapshotOp) -> SnapshotOutcome {
        match op {
            SnapshotOp::SaveCurrent { workout } => match self.save(&workout) {
                Ok(()) => SnapshotOutcome::Ok,
                Err(e) => SnapshotOutcome::Failed {
                    message: format!("could not save recovery snapshot: {}", e),
                },
            },
            SnapshotOp::LoadCurrent => match self.load() {
                Ok(workout) => SnapshotOutcome::Loaded { workout },
                Err(e) => SnapshotOutcome::Failed {
                    message: format!("could not read recovery snapshot: {}", e),
                },
            },
            SnapshotOp::DeleteCurrent => match self.delete() {
                Ok(()) => SnapshotOutcome::Ok,
                Err(e) => SnapshotOutcome::Failed {
                    message: format!("could not clear recovery snapshot: {}", e),
                },
            },
        }
    }
}
