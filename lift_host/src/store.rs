//! Durable workout storage with file locking.
//!
//! Each workout is one JSON document at `<data_dir>/workouts/<id>.json`.
//! Saving replaces the whole document, so re-delivering a save request is
//! harmless, and deleting a workout removes its exercises and sets with it.
//! Writes go through a locked temp file and an atomic rename; reads take a
//! shared lock.

use fs2::FileExt;
use lift_core::{Error, Result, Workout, WorkoutSummary};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Atomically write a JSON document:
/// 1. Writing to a locked temp file in the same directory
/// 2. Syncing to disk
/// 3. Renaming over the destination
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
    })?)?;

    // Exclusive lock on the temp file serializes concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Read a JSON document with a shared lock
///
/// Returns Ok(None) when the file does not exist; a file that exists but
/// cannot be read or parsed is an error, and callers decide whether that is
/// fatal or skippable.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;

    // Shared lock for reading
    file.lock_shared()?;

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    let read_result = reader.read_to_string(&mut contents);
    file.unlock()?;
    read_result?;

    let value = serde_json::from_str(&contents)
        .map_err(|e| Error::Store(format!("Failed to parse {:?}: {}", path, e)))?;
    Ok(Some(value))
}

/// One-JSON-file-per-workout store
#[derive(Clone, Debug)]
pub struct WorkoutStore {
    dir: PathBuf,
}

impl WorkoutStore {
    /// Store rooted at `<data_dir>/workouts`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("workouts"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// Save a workout, replacing any existing document with the same id
    pub fn save(&self, workout: &Workout) -> Result<()> {
        write_json_atomic(&self.path_for(workout.id), workout)?;
        tracing::debug!(workout_id = %workout.id, "saved workout to {:?}", self.dir);
        Ok(())
    }

    /// Load one workout in full; Ok(None) when no such document exists
    pub fn load(&self, id: Uuid) -> Result<Option<Workout>> {
        read_json(&self.path_for(id))
    }

    /// Delete one workout; Ok(false) when it was already gone
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        match std::fs::remove_file(self.path_for(id)) {
            Ok(()) => {
                tracing::debug!(workout_id = %id, "deleted workout");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Summaries of every stored workout, newest first
    ///
    /// A document that fails to read or parse is logged and skipped; one
    /// corrupt file never hides the rest of the history.
    pub fn load_summaries(&self) -> Result<Vec<WorkoutSummary>> {
        let workouts = self.load_workouts()?;
        Ok(workouts.iter().map(WorkoutSummary::from).collect())
    }

    /// Every stored workout in full, newest first, skipping corrupt files
    pub fn load_workouts(&self) -> Result<Vec<Workout>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut workouts = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }
            match read_json::<Workout>(&path) {
                Ok(Some(workout)) => workouts.push(workout),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Skipping unreadable workout file {:?}: {}", path, e);
                }
            }
        }
        workouts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(workouts)
    }
}
