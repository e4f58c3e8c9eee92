use crate::audio::CaptureSettings;

use std::time::Duration;

/// Refresh cadence of the readout while recording.
pub const DEFAULT_RECORDING_TICK: Duration = Duration::from_secs(1);

/// Refresh cadence of the readout while playing.
pub const DEFAULT_PLAYBACK_TICK: Duration = Duration::from_millis(100);

/// Feature switches and timings for a [`SessionController`](crate::SessionController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Whether `pause_toggle` is available.
    pub pause_enabled: bool,
    /// Format requested from each recorder.
    pub capture: CaptureSettings,
    /// Tick period while recording. The counter advances one second per tick.
    pub recording_tick: Duration,
    /// Tick period while playing.
    pub playback_tick: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            pause_enabled: true,
            capture: CaptureSettings::default(),
            recording_tick: DEFAULT_RECORDING_TICK,
            playback_tick: DEFAULT_PLAYBACK_TICK,
        }
    }
}
