use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

/// Sending half of the session event channel.
pub type EventSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half of the session event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Creates the channel that carries asynchronous results back to the controller.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Identifies one record or playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CycleId(pub u64);

impl CycleId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why the platform's audio route changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChangeReason {
    /// A device was connected, e.g. headphones plugged in.
    NewDeviceAvailable,
    /// A device in use went away, e.g. headphones unplugged.
    OldDeviceUnavailable,
    /// Any other route change.
    Other,
}

/// Everything that reaches the controller outside of a direct user call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The recorder finalized its file.
    RecordingFinished {
        /// Cycle the recorder belonged to.
        cycle: CycleId,
        /// Whether the file was written successfully.
        success: bool,
    },
    /// The player reached the end or was stopped.
    PlaybackFinished {
        /// Cycle the player belonged to.
        cycle: CycleId,
        /// Whether playback completed without error.
        success: bool,
    },
    /// Periodic readout refresh.
    Tick {
        /// Cycle the ticker was started for.
        cycle: CycleId,
    },
    /// The audio route changed.
    RouteChanged(RouteChangeReason),
    /// The permission prompt was answered.
    PermissionResolved {
        /// Whether microphone access was granted.
        granted: bool,
    },
}

/// Which audio object a [`Completion`] reports for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// A capture object.
    Recording,
    /// A playback object.
    Playback,
}

/// One-shot handle an audio object uses to report that it has finished.
#[derive(Debug)]
pub struct Completion {
    cycle: CycleId,
    kind: CompletionKind,
    events: EventSender,
}

impl Completion {
    /// Creates a handle that reports into `events`.
    pub fn new(cycle: CycleId, kind: CompletionKind, events: EventSender) -> Self {
        Self {
            cycle,
            kind,
            events,
        }
    }

    /// Cycle this handle belongs to.
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    /// Which object this handle reports for.
    pub fn kind(&self) -> CompletionKind {
        self.kind
    }

    /// Reports completion. Consumes the handle so it fires at most once.
    pub fn finish(self, success: bool) {
        let event = match self.kind {
            CompletionKind::Recording => SessionEvent::RecordingFinished {
                cycle: self.cycle,
                success,
            },
            CompletionKind::Playback => SessionEvent::PlaybackFinished {
                cycle: self.cycle,
                success,
            },
        };

        if self.events.send(event).is_err() {
            debug!(cycle = %self.cycle, "Session channel closed, completion dropped");
        }
    }
}
