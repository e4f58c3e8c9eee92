//! Voice Memo Core Library
//!
//! Recording session state machine for an audio note taker: record to a
//! file, keep an ordered library of recordings, play them back, pause and
//! resume, delete. Audio objects are reached through the [`AudioBackend`]
//! trait; [`CpalBackend`] implements it with `cpal` and WAV files.
//!
//! # Example
//!
//! ```no_run
//! use voice_memo_core::{
//!     CpalBackend, CoreResult, Library, MicrophonePermission, Permission, PermissionReply,
//!     SessionController, SessionOptions, SettingsStore, StorageMode, event_channel,
//! };
//!
//! struct AlwaysGranted;
//!
//! impl MicrophonePermission for AlwaysGranted {
//!     fn status(&self) -> Permission {
//!         Permission::Granted
//!     }
//!
//!     fn request(&mut self, reply: PermissionReply) {
//!         reply.resolve(true);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CoreResult<()> {
//!     let store = SettingsStore::new("memos/settings.toml");
//!     let library = Library::open("memos/recordings", StorageMode::Multiple, store)?;
//!     let (events_tx, mut events_rx) = event_channel();
//!
//!     let mut controller = SessionController::new(
//!         SessionOptions::default(),
//!         Box::new(CpalBackend::default()),
//!         Box::new(AlwaysGranted),
//!         library,
//!         events_tx,
//!     );
//!
//!     controller.start_recording()?;
//!     tokio::time::sleep(std::time::Duration::from_secs(3)).await;
//!     controller.stop_recording()?;
//!
//!     while controller.state().is_recording() {
//!         if let Some(event) = events_rx.recv().await {
//!             controller.handle_event(event)?;
//!         }
//!     }
//!
//!     println!("Saved {} recordings", controller.entries().len());
//!     Ok(())
//! }
//! ```

mod audio;
mod error;
mod library;
mod session;

pub use {
    audio::{
        AudioBackend, CaptureQuality, CaptureSettings, CpalBackend, CpalPlayer, CpalRecorder,
        DecodedClip, DeviceSnapshot, Player, Recorder, RouteMonitor,
    },
    error::{Notice, Result as CoreResult, SessionError},
    library::{
        Library, RECORDING_EXTENSION, SINGLE_RECORDING_NAME, STORED_NAMES_KEY, SettingsStore,
        StorageMode,
    },
    session::{
        Completion, CompletionKind, CycleId, DEFAULT_PLAYBACK_TICK, DEFAULT_RECORDING_TICK,
        ElapsedCounter, EventReceiver, EventSender, MAX_DISPLAY_SECONDS, MicrophonePermission,
        Permission, PermissionReply, RouteChangeReason, SessionController, SessionEvent,
        SessionOptions, SessionState, Ticker, ZERO_DISPLAY, event_channel, format_elapsed,
    },
};
