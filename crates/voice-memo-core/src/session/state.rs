use std::fmt;

/// Session state of the recording controller.
///
/// `paused` only exists on the active variants, so an idle session can
/// never be paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing is recording or playing.
    #[default]
    Idle,
    /// A capture object is active.
    Recording {
        /// Capture is suspended.
        paused: bool,
    },
    /// A playback object is active.
    Playing {
        /// Playback is suspended.
        paused: bool,
    },
}

impl SessionState {
    /// Whether no cycle is active.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a recording cycle is active.
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Whether a playback cycle is active.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// Whether the active cycle is paused. Always false when idle.
    pub fn is_paused(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Recording { paused } | Self::Playing { paused } => *paused,
        }
    }

    /// Flips the paused flag of an active cycle.
    ///
    /// Returns the new flag, or `None` when idle.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        match self {
            Self::Idle => None,
            Self::Recording { paused } | Self::Playing { paused } => {
                *paused = !*paused;
                Some(*paused)
            }
        }
    }

    /// Short label used in logs and notices.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { paused: false } => "recording",
            Self::Recording { paused: true } => "recording (paused)",
            Self::Playing { paused: false } => "playing",
            Self::Playing { paused: true } => "playing (paused)",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
