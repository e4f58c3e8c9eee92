use crate::config::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, default_channels, default_sample_rate};

use serde::{Deserialize, Serialize};
use voice_memo_core::{CaptureQuality, CaptureSettings};

/// Audio device and capture format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Microphone name (None = default device).
    #[serde(default)]
    pub input_device: Option<String>,
    /// Playback device name (None = default device).
    #[serde(default)]
    pub output_device: Option<String>,
    /// Requested capture sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Requested capture channel count.
    #[serde(default = "default_channels")]
    pub channels: u16,
    /// Stored sample format.
    #[serde(default)]
    pub quality: CaptureQuality,
}

impl AudioConfig {
    /// Capture format handed to each recorder.
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            sample_rate: self.sample_rate,
            channels: self.channels,
            quality: self.quality,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            input_device: None,
            output_device: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            quality: CaptureQuality::default(),
        }
    }
}
