//! Traits the session controller uses to reach the platform's audio objects.

use crate::session::Completion;

use std::{io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// Sample encoding of captured files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureQuality {
    /// 16-bit integer PCM.
    #[default]
    Standard,
    /// 32-bit float PCM.
    High,
}

/// Format requested from a capture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Requested channel count.
    pub channels: u16,
    /// Sample encoding.
    pub quality: CaptureQuality,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            quality: CaptureQuality::Standard,
        }
    }
}

/// A capture object bound to one file.
pub trait Recorder {
    /// Starts or resumes capture.
    fn record(&mut self) -> io::Result<()>;

    /// Suspends capture without finalizing.
    fn pause(&mut self) -> io::Result<()>;

    /// Requests finalization. Completion is reported later.
    fn stop(&mut self);
}

/// A playback object bound to one file.
pub trait Player {
    /// Starts or resumes playback.
    fn play(&mut self) -> io::Result<()>;

    /// Suspends playback.
    fn pause(&mut self) -> io::Result<()>;

    /// Requests the end of playback. Completion is reported later.
    fn stop(&mut self);

    /// Playback position reported by the platform.
    fn position(&self) -> Duration;
}

/// Factory for capture and playback objects.
pub trait AudioBackend {
    /// Binds a new capture object to `path`. The file exists once this returns `Ok`.
    fn create_recorder(
        &mut self,
        path: &Path,
        settings: &CaptureSettings,
        completion: Completion,
    ) -> io::Result<Box<dyn Recorder>>;

    /// Binds a new playback object to the file at `path`.
    fn create_player(&mut self, path: &Path, completion: Completion)
    -> io::Result<Box<dyn Player>>;
}
