use std::{io, path::PathBuf};

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Microphone access has not been granted.
    #[error("Microphone permission not granted {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The platform could not allocate a capture object.
    #[error("Recorder setup failed: {source} {location}")]
    RecorderSetupFailed {
        /// Underlying I/O error from the audio backend.
        #[source]
        source: io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The platform could not allocate a playback object.
    #[error("Player setup failed: {source} {location}")]
    PlayerSetupFailed {
        /// Underlying I/O error from the audio backend.
        #[source]
        source: io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recording file for an entry is not on disk.
    #[error("Audio file missing: {path:?} {location}")]
    FileMissing {
        /// Path that was expected to exist.
        path: PathBuf,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Removing a recording file failed.
    #[error("Failed to delete {name}: {source} {location}")]
    DeleteFailed {
        /// Entry name that could not be deleted.
        name: String,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder finished unsuccessfully.
    #[error("Recording failed {location}")]
    RecordingFailed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The player finished unsuccessfully.
    #[error("Playback failed {location}")]
    PlaybackFailed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not valid in the current session state.
    #[error("Cannot {operation} while {state} {location}")]
    InvalidTransition {
        /// Operation that was requested.
        operation: &'static str,
        /// Human readable state at the time of the request.
        state: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No entry at the requested index.
    #[error("No recording at index {index} {location}")]
    EntryNotFound {
        /// Requested zero-based index.
        index: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Pause support is disabled for this session.
    #[error("Pause is not enabled {location}")]
    PauseUnsupported {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An active audio object rejected a request.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The settings store could not be read or written.
    #[error("Settings store error: {reason} {location}")]
    StoreFailed {
        /// Description of the store failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// A dismissable, user-facing message describing a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short heading.
    pub title: String,
    /// One line explanation.
    pub message: String,
}

impl SessionError {
    /// Builds the single notice shown to the user for this error.
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::PermissionDenied { .. } => {
                "App does not have permission to use your microphone.".to_string()
            }
            Self::RecorderSetupFailed { source, .. } => source.to_string(),
            Self::PlayerSetupFailed { .. } => "Could not setup play function.".to_string(),
            Self::FileMissing { .. } => "Audio file is missing.".to_string(),
            Self::DeleteFailed { .. } => "Could not delete recording.".to_string(),
            Self::RecordingFailed { .. } => "Recording failed.".to_string(),
            Self::PlaybackFailed { .. } => "Could not play audio file.".to_string(),
            Self::InvalidTransition {
                operation, state, ..
            } => format!("Cannot {operation} while {state}."),
            Self::EntryNotFound { index, .. } => format!("There is no recording {}.", index + 1),
            Self::PauseUnsupported { .. } => "Pause is disabled.".to_string(),
            Self::DeviceError { reason, .. } | Self::StoreFailed { reason, .. } => reason.clone(),
        };

        Notice {
            title: "Error".to_string(),
            message,
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
