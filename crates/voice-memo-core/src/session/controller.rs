//! Recording session state machine.
//!
//! User actions call the public operations directly. Everything the platform
//! reports later (finalize, playback end, ticks, route changes, permission
//! answers) arrives as a [`SessionEvent`] and is fed to [`handle_event`].
//! Both paths run on the same task, so the controller needs no locking.
//!
//! [`handle_event`]: SessionController::handle_event

use crate::{
    CoreResult, SessionError,
    audio::{AudioBackend, Player, Recorder},
    library::Library,
    session::{
        Completion, CompletionKind, CycleId, ElapsedCounter, EventSender, MicrophonePermission,
        Permission, PermissionReply, RouteChangeReason, SessionEvent, SessionOptions,
        SessionState, Ticker, ZERO_DISPLAY, format_elapsed,
    },
};

use std::{fs, io, panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Owns the session state and the active recorder or player.
pub struct SessionController {
    options: SessionOptions,
    state: SessionState,
    backend: Box<dyn AudioBackend>,
    permission_provider: Box<dyn MicrophonePermission>,
    permission: Permission,
    permission_requested: bool,
    library: Library,
    recorder: Option<Box<dyn Recorder>>,
    player: Option<Box<dyn Player>>,
    /// Entry appended for the recording in progress.
    pending_entry: Option<String>,
    /// A stop was requested and the completion event has not arrived yet.
    finalizing: bool,
    counter: ElapsedCounter,
    display: String,
    ticker: Ticker,
    cycle: CycleId,
    events: EventSender,
}

impl SessionController {
    /// Creates an idle controller and queries microphone permission.
    ///
    /// An undetermined permission triggers a request right away; the answer
    /// comes back as [`SessionEvent::PermissionResolved`] on `events`.
    pub fn new(
        options: SessionOptions,
        backend: Box<dyn AudioBackend>,
        permission_provider: Box<dyn MicrophonePermission>,
        library: Library,
        events: EventSender,
    ) -> Self {
        let mut controller = Self {
            options,
            state: SessionState::Idle,
            backend,
            permission_provider,
            permission: Permission::Undetermined,
            permission_requested: false,
            library,
            recorder: None,
            player: None,
            pending_entry: None,
            finalizing: false,
            counter: ElapsedCounter::default(),
            display: ZERO_DISPLAY.to_string(),
            ticker: Ticker::new(events.clone()),
            cycle: CycleId::default(),
            events,
        };
        controller.refresh_permission();
        controller
    }

    /// Starts a new recording into a freshly allocated file.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless idle, `PermissionDenied` without microphone
    /// access, `RecorderSetupFailed` if the recorder cannot be created or started.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start_recording(&mut self) -> CoreResult<()> {
        self.require_idle("start recording")?;

        if self.permission == Permission::Undetermined {
            self.refresh_permission();
        }
        if self.permission != Permission::Granted {
            warn!(permission = ?self.permission, "Recording refused");
            return Err(SessionError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let name = self.library.allocate_name();
        let path = self.library.path_of(&name);
        let cycle = self.advance_cycle();
        let completion = Completion::new(cycle, CompletionKind::Recording, self.events.clone());

        let mut recorder = self
            .backend
            .create_recorder(&path, &self.options.capture, completion)
            .map_err(|source| SessionError::RecorderSetupFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Err(e) = self.library.append(name.clone()) {
            drop(recorder);
            remove_partial_file(&path);
            return Err(e);
        }

        if let Err(source) = recorder.record() {
            drop(recorder);
            self.discard_entry(&name);
            return Err(SessionError::RecorderSetupFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.recorder = Some(recorder);
        self.pending_entry = Some(name.clone());
        self.finalizing = false;
        self.counter.reset();
        self.display = ZERO_DISPLAY.to_string();
        self.state = SessionState::Recording { paused: false };
        self.ticker.start(cycle, self.options.recording_tick);

        info!(cycle = %cycle, entry = %name, "Recording started");

        Ok(())
    }

    /// Asks the recorder to finalize. The session stays in `Recording` until
    /// the completion event arrives. Repeated requests are ignored.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) -> CoreResult<()> {
        if !self.state.is_recording() {
            return Err(self.invalid_transition("stop recording"));
        }
        if self.finalizing {
            debug!("Recording already finalizing");
            return Ok(());
        }

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.stop();
        }
        self.finalizing = true;

        info!(cycle = %self.cycle, "Recording stop requested");

        Ok(())
    }

    /// Pauses or resumes whichever object is active. Returns the new paused flag.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause_toggle(&mut self) -> CoreResult<bool> {
        if !self.options.pause_enabled {
            return Err(SessionError::PauseUnsupported {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.state.is_idle() || self.finalizing {
            return Err(self.invalid_transition("pause"));
        }

        let resume = self.state.is_paused();
        let outcome = if self.state.is_recording() {
            self.recorder
                .as_mut()
                .map(|recorder| if resume { recorder.record() } else { recorder.pause() })
        } else {
            self.player
                .as_mut()
                .map(|player| if resume { player.play() } else { player.pause() })
        };

        if let Some(Err(e)) = outcome {
            return Err(SessionError::DeviceError {
                reason: format!("Failed to {}: {}", if resume { "resume" } else { "pause" }, e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let paused = self.state.toggle_pause().unwrap_or(false);
        info!(paused, state = %self.state, "Pause toggled");

        Ok(paused)
    }

    /// Plays the entry at `index`.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless idle, `EntryNotFound` for a bad index,
    /// `FileMissing` if the file is gone (no player is created), and
    /// `PlayerSetupFailed` if the player cannot be created or started.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start_playback(&mut self, index: usize) -> CoreResult<()> {
        self.require_idle("play")?;

        let name = self
            .library
            .get(index)
            .ok_or_else(|| SessionError::EntryNotFound {
                index,
                location: ErrorLocation::from(Location::caller()),
            })?
            .to_string();
        let path = self.library.path_of(&name);

        if !path.is_file() {
            warn!(path = ?path, "Recording file missing");
            return Err(SessionError::FileMissing {
                path,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let cycle = self.advance_cycle();
        let completion = Completion::new(cycle, CompletionKind::Playback, self.events.clone());

        let mut player = self
            .backend
            .create_player(&path, completion)
            .map_err(|source| SessionError::PlayerSetupFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        player
            .play()
            .map_err(|source| SessionError::PlayerSetupFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.player = Some(player);
        self.finalizing = false;
        self.display = ZERO_DISPLAY.to_string();
        self.state = SessionState::Playing { paused: false };
        self.ticker.start(cycle, self.options.playback_tick);

        info!(cycle = %cycle, entry = %name, "Playback started");

        Ok(())
    }

    /// Asks the player to stop. The session stays in `Playing` until the
    /// completion event arrives. Repeated requests are ignored.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_playback(&mut self) -> CoreResult<()> {
        if !self.state.is_playing() {
            return Err(self.invalid_transition("stop playback"));
        }
        if self.finalizing {
            debug!("Playback already stopping");
            return Ok(());
        }

        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.finalizing = true;

        info!(cycle = %self.cycle, "Playback stop requested");

        Ok(())
    }

    /// The record button: starts recording when idle, otherwise stops
    /// whatever is running.
    #[track_caller]
    pub fn toggle_record(&mut self) -> CoreResult<()> {
        match self.state {
            SessionState::Idle => self.start_recording(),
            SessionState::Recording { .. } => self.stop_recording(),
            SessionState::Playing { .. } => self.stop_playback(),
        }
    }

    /// Stops the active cycle, if any. Returns whether a completion event
    /// is now awaited.
    #[track_caller]
    pub fn stop_active(&mut self) -> CoreResult<bool> {
        match self.state {
            SessionState::Idle => Ok(false),
            SessionState::Recording { .. } => self.stop_recording().map(|()| true),
            SessionState::Playing { .. } => self.stop_playback().map(|()| true),
        }
    }

    /// Deletes the entry at `index` together with its file.
    ///
    /// A file that is already gone counts as deleted. Returns the removed name.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete_entry(&mut self, index: usize) -> CoreResult<String> {
        self.require_idle("delete a recording")?;

        let name = self
            .library
            .get(index)
            .ok_or_else(|| SessionError::EntryNotFound {
                index,
                location: ErrorLocation::from(Location::caller()),
            })?
            .to_string();
        let path = self.library.path_of(&name);

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = ?path, "Recording file already gone");
            }
            Err(source) => {
                error!(path = ?path, error = %source, "Failed to delete recording");
                return Err(SessionError::DeleteFailed {
                    name,
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        let removed = self.library.remove(index)?;
        info!(index, entry = %removed, "Recording deleted");

        Ok(removed)
    }

    /// Refreshes the readout. Returns the new text when it was recomputed.
    ///
    /// Recording time comes from the tick counter, playback time from the
    /// player's reported position.
    pub fn on_tick(&mut self) -> Option<&str> {
        if self.finalizing {
            return None;
        }

        match self.state {
            SessionState::Recording { paused: false } => {
                let seconds = self.counter.advance();
                self.display = format_elapsed(seconds);
            }
            SessionState::Playing { paused: false } => {
                let position = self.player.as_ref()?.position();
                self.display = format_elapsed(position.as_secs());
            }
            _ => return None,
        }

        Some(&self.display)
    }

    /// Reacts to an audio route change.
    ///
    /// Losing a device stops recording and pauses playback; gaining one stops
    /// recording. Neither is reported as an error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn on_route_change(&mut self, reason: RouteChangeReason) -> CoreResult<()> {
        match reason {
            RouteChangeReason::OldDeviceUnavailable => {
                if self.state.is_recording() {
                    self.stop_recording()?;
                }
                if self.state == (SessionState::Playing { paused: false }) && !self.finalizing {
                    if let Some(player) = self.player.as_mut() {
                        player.pause().map_err(|e| SessionError::DeviceError {
                            reason: format!("Failed to pause: {}", e),
                            location: ErrorLocation::from(Location::caller()),
                        })?;
                    }
                    self.state.toggle_pause();
                    info!("Playback paused after device loss");
                }
            }
            RouteChangeReason::NewDeviceAvailable => {
                if self.state.is_recording() {
                    self.stop_recording()?;
                }
            }
            RouteChangeReason::Other => {}
        }

        Ok(())
    }

    /// Applies one event from the session channel.
    ///
    /// Completion and tick events from an earlier cycle are ignored.
    ///
    /// # Errors
    ///
    /// `RecordingFailed` / `PlaybackFailed` when a cycle ends unsuccessfully;
    /// the session is already back to idle when these are returned.
    #[track_caller]
    pub fn handle_event(&mut self, event: SessionEvent) -> CoreResult<()> {
        match event {
            SessionEvent::RecordingFinished { cycle, success } => {
                if cycle != self.cycle || !self.state.is_recording() {
                    debug!(cycle = %cycle, "Ignoring stale recording completion");
                    return Ok(());
                }
                self.finish_recording(success)
            }
            SessionEvent::PlaybackFinished { cycle, success } => {
                if cycle != self.cycle || !self.state.is_playing() {
                    debug!(cycle = %cycle, "Ignoring stale playback completion");
                    return Ok(());
                }
                self.finish_playback(success)
            }
            SessionEvent::Tick { cycle } => {
                if cycle == self.cycle {
                    self.on_tick();
                }
                Ok(())
            }
            SessionEvent::RouteChanged(reason) => self.on_route_change(reason),
            SessionEvent::PermissionResolved { granted } => {
                self.permission = if granted {
                    Permission::Granted
                } else {
                    Permission::Denied
                };
                self.permission_requested = false;
                info!(granted, "Microphone permission resolved");
                Ok(())
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current readout, `HH:MM:SS`.
    pub fn elapsed_display(&self) -> &str {
        &self.display
    }

    /// Entry names in library order.
    pub fn entries(&self) -> &[String] {
        self.library.entries()
    }

    /// The recording library.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Cached microphone permission.
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Whether a stop was requested and its completion is pending.
    pub fn is_finalizing(&self) -> bool {
        self.finalizing
    }

    /// Whether the periodic tick is scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Options this controller was built with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[track_caller]
    fn finish_recording(&mut self, success: bool) -> CoreResult<()> {
        self.ticker.cancel();
        self.recorder = None;

        let entry = self.pending_entry.take();
        let produced = entry
            .as_deref()
            .is_some_and(|name| self.library.path_of(name).is_file());
        let kept = success && produced;

        if !kept && let Some(name) = entry.as_deref() {
            self.discard_entry(name);
        }

        let seconds = self.counter.seconds();
        self.reset_cycle();

        if kept {
            info!(entry = ?entry, seconds, "Recording saved");
            Ok(())
        } else {
            warn!(success, produced, "Recording discarded");
            Err(SessionError::RecordingFailed {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    #[track_caller]
    fn finish_playback(&mut self, success: bool) -> CoreResult<()> {
        self.ticker.cancel();
        self.player = None;
        self.reset_cycle();

        if success {
            info!("Playback finished");
            Ok(())
        } else {
            warn!("Playback failed");
            Err(SessionError::PlaybackFailed {
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    fn reset_cycle(&mut self) {
        self.counter.reset();
        self.display = ZERO_DISPLAY.to_string();
        self.finalizing = false;
        self.state = SessionState::Idle;
    }

    fn discard_entry(&mut self, name: &str) {
        if let Err(e) = self.library.discard(name) {
            error!(entry = %name, error = ?e, "Failed to drop entry from library");
        }
        remove_partial_file(&self.library.path_of(name));
    }

    fn advance_cycle(&mut self) -> CycleId {
        self.cycle = self.cycle.next();
        self.cycle
    }

    fn refresh_permission(&mut self) {
        self.permission = self.permission_provider.status();

        if self.permission == Permission::Undetermined && !self.permission_requested {
            self.permission_requested = true;
            self.permission_provider
                .request(PermissionReply::new(self.events.clone()));
            info!("Microphone permission requested");
        }
    }

    #[track_caller]
    fn require_idle(&self, operation: &'static str) -> CoreResult<()> {
        if self.state.is_idle() {
            Ok(())
        } else {
            Err(self.invalid_transition(operation))
        }
    }

    #[track_caller]
    fn invalid_transition(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: if self.finalizing {
                "stopping"
            } else {
                self.state.label()
            },
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

fn remove_partial_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = ?path, "Removed partial recording"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = ?path, error = %e, "Failed to remove partial recording"),
    }
}
