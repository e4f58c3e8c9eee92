use crate::config::{
    DEFAULT_PAUSE_ENABLED, DEFAULT_PLAYBACK_TICK_MS, DEFAULT_RECORDING_TICK_MS,
    DEFAULT_ROUTE_POLL_MS, default_pause_enabled, default_playback_tick_ms,
    default_recording_tick_ms, default_route_poll_ms,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Whether `pause` is available.
    #[serde(default = "default_pause_enabled")]
    pub pause_enabled: bool,
    /// Readout refresh period while recording, in milliseconds.
    #[serde(default = "default_recording_tick_ms")]
    pub recording_tick_ms: u64,
    /// Readout refresh period while playing, in milliseconds.
    #[serde(default = "default_playback_tick_ms")]
    pub playback_tick_ms: u64,
    /// Device list polling period, in milliseconds.
    #[serde(default = "default_route_poll_ms")]
    pub route_poll_ms: u64,
    /// Remembered answer to the microphone prompt (None = not asked yet).
    #[serde(default)]
    pub microphone_access: Option<bool>,
}

impl BehaviourConfig {
    /// Device list polling period.
    pub fn route_poll(&self) -> Duration {
        Duration::from_millis(self.route_poll_ms)
    }
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            pause_enabled: DEFAULT_PAUSE_ENABLED,
            recording_tick_ms: DEFAULT_RECORDING_TICK_MS,
            playback_tick_ms: DEFAULT_PLAYBACK_TICK_MS,
            route_poll_ms: DEFAULT_ROUTE_POLL_MS,
            microphone_access: None,
        }
    }
}
