use crate::{CoreResult, SessionError};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use toml::{Table, Value};
use tracing::{debug, instrument};

/// Small key-value settings file in TOML.
///
/// Every write replaces the whole file through a temp file and rename, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the list stored under `key`. Missing file or key yields an empty list.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn string_list(&self, key: &str) -> CoreResult<Vec<String>> {
        let table = self.read_table()?;

        let Some(value) = table.get(key) else {
            return Ok(Vec::new());
        };

        let items = value.as_array().ok_or_else(|| SessionError::StoreFailed {
            reason: format!("Key {key} is not a list"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SessionError::StoreFailed {
                        reason: format!("Key {key} holds a non-string item"),
                        location: ErrorLocation::from(Location::caller()),
                    })
            })
            .collect()
    }

    /// Replaces the list stored under `key`, keeping every other key.
    #[track_caller]
    #[instrument(skip(self, values), fields(count = values.len()))]
    pub fn set_string_list(&self, key: &str, values: &[String]) -> CoreResult<()> {
        let mut table = self.read_table()?;
        table.insert(
            key.to_string(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
        self.write_table(&table)
    }

    #[track_caller]
    fn read_table(&self) -> CoreResult<Table> {
        if !self.path.exists() {
            return Ok(Table::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to read settings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        toml::from_str(&contents).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to parse settings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn write_table(&self, table: &Table) -> CoreResult<()> {
        let contents = toml::to_string_pretty(table).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to serialize settings: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::StoreFailed {
                reason: format!("Failed to create settings directory: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let temp_path = self.path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to create temp settings file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|e| SessionError::StoreFailed {
                reason: format!("Failed to write temp settings file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, &self.path).map_err(|e| SessionError::StoreFailed {
            reason: format!("Failed to replace settings file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(path = ?self.path, "Settings written");

        Ok(())
    }
}
