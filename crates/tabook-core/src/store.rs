//! JSON snapshot storage.
//!
//! [`JsonStore`] is the file-backed [`Persistence`] collaborator: it loads a
//! [`Model`] from a snapshot file at startup and rewrites the file after each
//! mutating command.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{Result, TabookError};
use crate::model::{Model, Snapshot};
use crate::runner::Persistence;

/// Snapshot file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a store backed by `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the model, or returns an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `TabookError::StateFileCorrupted` if the file is not a valid
    /// snapshot or if its contents break an engine invariant (for example two
    /// overlapping consultations).
    pub fn load(&self, config: &Config) -> Result<Model> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file, starting empty");
                return Ok(Model::new(config));
            }
            Err(e) => return Err(TabookError::Io(e)),
        };

        let snapshot: Snapshot = serde_json::from_str(&contents)
            .map_err(|e| TabookError::state_corrupted(&self.path, e.to_string()))?;
        let model = Model::from_snapshot(config, snapshot)
            .map_err(|e| TabookError::state_corrupted(&self.path, e.to_string()))?;

        debug!(
            path = %self.path.display(),
            persons = model.persons().count(),
            tutorials = model.tutorials().len(),
            consultations = model.consultations().len(),
            "Loaded state"
        );
        Ok(model)
    }
}

impl Persistence for JsonStore {
    fn save(&mut self, model: &Model) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&model.snapshot())?;
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "Saved state");
        Ok(())
    }
}
