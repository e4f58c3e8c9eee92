//! Ordered recording library and its persisted name list.

use crate::{CoreResult, SessionError, library::SettingsStore};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Settings key holding the ordered list of recording names.
pub const STORED_NAMES_KEY: &str = "storedNames";

/// Extension given to every recording file.
pub const RECORDING_EXTENSION: &str = "wav";

/// File name used when only one recording is kept.
pub const SINGLE_RECORDING_NAME: &str = "recording.wav";

/// How recordings are named on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// One fixed file, overwritten by each recording.
    Single,
    /// A fresh UUID-named file per recording.
    #[default]
    Multiple,
}

/// The user's recordings, in creation order.
#[derive(Debug)]
pub struct Library {
    directory: PathBuf,
    mode: StorageMode,
    store: SettingsStore,
    names: Vec<String>,
}

impl Library {
    /// Opens the library in `directory`, creating it if needed.
    ///
    /// Persisted names whose file has disappeared are dropped and the
    /// trimmed list is written back.
    #[track_caller]
    #[instrument(skip(directory, store), fields(directory = ?directory.as_ref()))]
    pub fn open<P: AsRef<Path>>(
        directory: P,
        mode: StorageMode,
        store: SettingsStore,
    ) -> CoreResult<Self> {
        let directory = directory.as_ref().to_path_buf();

        fs::create_dir_all(&directory).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to create recordings directory {:?}: {}", directory, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let stored = store.string_list(STORED_NAMES_KEY)?;
        let stored_count = stored.len();
        let names: Vec<String> = stored
            .into_iter()
            .filter(|name| {
                let present = directory.join(name).is_file();
                if !present {
                    warn!(name = %name, "Dropping recording with missing file");
                }
                present
            })
            .collect();

        let library = Self {
            directory,
            mode,
            store,
            names,
        };

        if library.names.len() != stored_count {
            library.persist()?;
        }

        info!(count = library.names.len(), mode = ?mode, "Recording library opened");

        Ok(library)
    }

    /// Picks the file name for the next recording.
    pub fn allocate_name(&self) -> String {
        match self.mode {
            StorageMode::Single => SINGLE_RECORDING_NAME.to_string(),
            StorageMode::Multiple => format!("{}.{}", Uuid::new_v4(), RECORDING_EXTENSION),
        }
    }

    /// Full path for `name` inside the library directory.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }

    /// Adds `name` at the end and persists. Single mode keeps one copy only.
    #[track_caller]
    pub fn append(&mut self, name: String) -> CoreResult<()> {
        if self.mode == StorageMode::Single && self.names.contains(&name) {
            return Ok(());
        }
        self.names.push(name);
        if let Err(e) = self.persist() {
            self.names.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Drops the most recent occurrence of `name` and persists.
    ///
    /// Returns whether anything was removed.
    #[track_caller]
    pub fn discard(&mut self, name: &str) -> CoreResult<bool> {
        let Some(index) = self.names.iter().rposition(|n| n == name) else {
            return Ok(false);
        };
        self.names.remove(index);
        self.persist()?;
        Ok(true)
    }

    /// Removes the entry at `index`, keeping the order of the rest, and persists.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> CoreResult<String> {
        if index >= self.names.len() {
            return Err(SessionError::EntryNotFound {
                index,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let name = self.names.remove(index);
        self.persist()?;
        Ok(name)
    }

    /// Name at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// All names in order.
    pub fn entries(&self) -> &[String] {
        &self.names
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display label for the entry at `index`.
    pub fn label(index: usize) -> String {
        format!("Recording {}", index + 1)
    }

    /// Naming mode.
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Directory holding the recording files.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[track_caller]
    fn persist(&self) -> CoreResult<()> {
        self.store.set_string_list(STORED_NAMES_KEY, &self.names)
    }
}
