/// Largest value that still fits `HH:MM:SS` (99:59:59).
pub const MAX_DISPLAY_SECONDS: u64 = 99 * 3600 + 59 * 60 + 59;

/// Readout shown whenever no cycle is active.
pub const ZERO_DISPLAY: &str = "00:00:00";

/// Formats whole seconds as `HH:MM:SS`.
///
/// Values beyond [`MAX_DISPLAY_SECONDS`] are clamped so the hour field
/// stays two digits wide.
pub fn format_elapsed(seconds: u64) -> String {
    let seconds = seconds.min(MAX_DISPLAY_SECONDS);
    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Whole seconds counted by recording ticks.
///
/// The recorder's own clock is not trusted after a route change, so the
/// recording readout is driven by this counter instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedCounter {
    seconds: u64,
}

impl ElapsedCounter {
    /// Advances by one second and returns the new total.
    pub fn advance(&mut self) -> u64 {
        self.seconds = self.seconds.saturating_add(1);
        self.seconds
    }

    /// Current total.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Back to the initial value.
    pub fn reset(&mut self) {
        self.seconds = 0;
    }
}
