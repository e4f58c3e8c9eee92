//! Configuration management for voice-memo.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, lazy validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, BehaviourConfig, LibraryConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use voice_memo_core::SessionOptions;

/// File holding the persisted recording list, inside the data directory.
pub(crate) const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Default recordings directory name, inside the data directory.
pub(crate) const RECORDINGS_DIR_NAME: &str = "recordings";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Audio device and capture format configuration.
    #[serde(default)]
    pub audio: AudioConfig,
    /// Recording storage configuration.
    #[serde(default)]
    pub library: LibraryConfig,
    /// Application behaviour settings.
    #[serde(default)]
    pub behaviour: BehaviourConfig,
}

impl Config {
    /// Load configuration from `path`, creating a default file if not found.
    ///
    /// Values are not validated here. Call `validate()` before building the
    /// session so a bad value is reported with the file that holds it.
    #[track_caller]
    #[instrument]
    pub fn load(path: &Path) -> AppResult<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            info!(config_path = ?path, "Configuration loaded");

            Ok(config)
        } else {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Check values that would make the session unusable.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        let problem = if self.audio.sample_rate == 0 {
            Some("audio.sample_rate must be greater than zero")
        } else if self.audio.channels == 0 {
            Some("audio.channels must be greater than zero")
        } else if self.behaviour.recording_tick_ms == 0 {
            Some("behaviour.recording_tick_ms must be greater than zero")
        } else if self.behaviour.playback_tick_ms == 0 {
            Some("behaviour.playback_tick_ms must be greater than zero")
        } else if self.behaviour.route_poll_ms == 0 {
            Some("behaviour.route_poll_ms must be greater than zero")
        } else {
            None
        };

        match problem {
            Some(reason) => Err(AppError::ConfigError {
                reason: reason.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Ok(()),
        }
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            debug!(config_dir = ?parent, "Created config directory");
        }

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Session options derived from the audio and behaviour sections.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            pause_enabled: self.behaviour.pause_enabled,
            capture: self.audio.capture_settings(),
            recording_tick: Duration::from_millis(self.behaviour.recording_tick_ms),
            playback_tick: Duration::from_millis(self.behaviour.playback_tick_ms),
        }
    }

    /// Recordings directory and settings file, relative to `data_dir`
    /// unless the library directory is configured explicitly.
    pub fn library_paths(&self, data_dir: &Path) -> (PathBuf, PathBuf) {
        let recordings = self
            .library
            .directory
            .clone()
            .unwrap_or_else(|| data_dir.join(RECORDINGS_DIR_NAME));
        (recordings, data_dir.join(SETTINGS_FILE_NAME))
    }

    /// Default configuration file location.
    #[track_caller]
    pub fn default_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Platform data directory for recordings and settings.
    #[track_caller]
    pub fn data_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voice-memo", "Voice-Memo").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
