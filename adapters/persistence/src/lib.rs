#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! JSON save file holding the player's unlock progress.
//!
//! The file contains a single object such as `{"unlocked_stage": 3}`. A
//! missing file means no stage beyond the first has been unlocked yet.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shifting_maze_core::UnlockProgress;
use tracing::{debug, warn};

const INDENT: &[u8] = b"    ";

/// Errors raised while reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The save file could not be read or written.
    #[error("failed to access save file {}", .path.display())]
    Io {
        /// Path of the save file or its temporary sibling.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The save file does not contain valid progress.
    #[error("save file {} is not valid progress JSON", .path.display())]
    Json {
        /// Path of the save file.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct StoredProgress {
    #[serde(default)]
    unlocked_stage: Option<usize>,
}

/// Location of the progress save file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// Creates a handle for the save file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads saved progress, falling back to the default when no file exists.
    pub fn load(&self) -> Result<UnlockProgress, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no save file, starting fresh");
                return Ok(UnlockProgress::default());
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let stored: StoredProgress =
            serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Json {
                path: self.path.clone(),
                source,
            })?;
        let progress = match stored.unlocked_stage {
            Some(count) if count > 0 => UnlockProgress::new(count),
            other => {
                warn!(
                    path = %self.path.display(),
                    unlocked_stage = ?other,
                    "save file lacks a usable unlocked_stage, defaulting to the first stage"
                );
                UnlockProgress::default()
            }
        };
        debug!(
            path = %self.path.display(),
            unlocked_stage = progress.unlocked_stage(),
            "loaded progress"
        );
        Ok(progress)
    }

    /// Writes progress to the save file, replacing it atomically.
    pub fn save(&self, progress: &UnlockProgress) -> Result<(), PersistenceError> {
        let mut bytes = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        progress
            .serialize(&mut serializer)
            .map_err(|source| PersistenceError::Json {
                path: self.path.clone(),
                source,
            })?;
        bytes.push(b'\n');

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.temp_path();
        fs::write(&temp_path, &bytes).map_err(|source| PersistenceError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            path = %self.path.display(),
            unlocked_stage = progress.unlocked_stage(),
            "saved progress"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
