mod controller;
mod elapsed;
mod event;
mod options;
mod permission;
mod state;
mod ticker;

pub(crate) use ticker::MIN_TICK_PERIOD;

pub use {
    controller::SessionController,
    elapsed::{ElapsedCounter, MAX_DISPLAY_SECONDS, ZERO_DISPLAY, format_elapsed},
    event::{
        Completion, CompletionKind, CycleId, EventReceiver, EventSender, RouteChangeReason,
        SessionEvent, event_channel,
    },
    options::{DEFAULT_PLAYBACK_TICK, DEFAULT_RECORDING_TICK, SessionOptions},
    permission::{MicrophonePermission, Permission, PermissionReply},
    state::SessionState,
    ticker::Ticker,
};
