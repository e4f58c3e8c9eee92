use crate::{
    AppError, AppResult, ConsoleOutput, UserCommand,
    config::Config,
    permission::parse_consent,
};

use std::{io::Write, path::PathBuf, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedReceiver,
};
use tracing::{error, info, instrument, warn};
use voice_memo_core::{
    EventReceiver, Library, PermissionReply, RouteMonitor, SessionController, SessionError,
    SessionEvent,
};

/// How long quit waits for an active recording to finalize.
pub(crate) const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Whether the loop keeps going after a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Main application state.
///
/// Owns the session controller and serializes user input, session events
/// and consent prompts through one `select!` loop on the current thread.
/// User-facing text goes to `W`, stdout in the binary.
pub struct App<W: Write> {
    pub(crate) controller: SessionController,
    pub(crate) events_rx: EventReceiver,
    pub(crate) consent_rx: UnboundedReceiver<PermissionReply>,
    pub(crate) route_monitor: Option<RouteMonitor>,
    pub(crate) config: Config,
    pub(crate) config_path: PathBuf,
    pub(crate) output: ConsoleOutput<W>,
    pub(crate) pending_consent: Option<PermissionReply>,
}

impl<W: Write> App<W> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice Memo starting");

        self.output.line("Voice Memo. Type `help` for commands.");
        self.output.listing(self.controller.entries());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if self.handle_line(&line) == Flow::Quit {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("Input closed, shutting down");
                        break;
                    }
                    Err(e) => {
                        error!(error = ?e, "Failed to read input");
                        break;
                    }
                },

                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                }

                Some(reply) = self.consent_rx.recv() => {
                    self.ask_consent(reply);
                }

                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => info!("Interrupted"),
                        Err(e) => error!(error = ?e, "Failed to listen for Ctrl-C"),
                    }
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.shutdown().await;
        info!("Voice Memo shut down successfully");

        Ok(())
    }

    /// Handle one line of user input.
    #[instrument(skip(self))]
    pub(crate) fn handle_line(&mut self, line: &str) -> Flow {
        if self.pending_consent.is_some() {
            self.answer_consent(line);
            return Flow::Continue;
        }

        let command = match line.parse::<UserCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Rejected input");
                if let AppError::InvalidCommand { reason, .. } = &e {
                    self.output.line(format!("Error: {}", reason));
                }
                return Flow::Continue;
            }
        };

        if command == UserCommand::Quit {
            return Flow::Quit;
        }

        if let Err(e) = self.execute(command) {
            self.report(&e);
        }

        Flow::Continue
    }

    /// Run one command against the controller.
    fn execute(&mut self, command: UserCommand) -> Result<(), SessionError> {
        match command {
            UserCommand::Record => {
                let was_idle = self.controller.state().is_idle();
                self.controller.toggle_record()?;
                if was_idle {
                    self.output.reset_readout();
                    self.show_readout();
                } else {
                    self.output.line("Stopping...");
                }
            }
            UserCommand::Stop => {
                if self.controller.stop_active()? {
                    self.output.line("Stopping...");
                } else {
                    self.output.line("Nothing to stop.");
                }
            }
            UserCommand::Pause => {
                let paused = self.controller.pause_toggle()?;
                self.output.line(if paused { "Paused." } else { "Resumed." });
                self.show_readout();
            }
            UserCommand::Play { .. } => {
                let index = command.index().unwrap_or_default();
                self.controller.start_playback(index)?;
                self.output
                    .line(format!("Playing {}.", Library::label(index)));
                self.output.reset_readout();
                self.show_readout();
            }
            UserCommand::Delete { .. } => {
                let index = command.index().unwrap_or_default();
                self.controller.delete_entry(index)?;
                self.output
                    .line(format!("Deleted {}.", Library::label(index)));
                self.output.listing(self.controller.entries());
            }
            UserCommand::List => self.output.listing(self.controller.entries()),
            UserCommand::Status => self.output.status(
                self.controller.state(),
                self.controller.elapsed_display(),
                self.controller.entries().len(),
            ),
            UserCommand::Help => self.output.help(),
            UserCommand::Quit => {}
        }

        Ok(())
    }

    /// Apply one session event and print whatever changed.
    pub(crate) fn handle_event(&mut self, event: SessionEvent) {
        let finishing = match &event {
            SessionEvent::RecordingFinished { .. } => self.controller.state().is_recording(),
            SessionEvent::PlaybackFinished { .. } => self.controller.state().is_playing(),
            _ => false,
        };
        let is_tick = matches!(event, SessionEvent::Tick { .. });
        let is_route_change = matches!(event, SessionEvent::RouteChanged(_));
        let before = self.controller.state();

        if let Err(e) = self.controller.handle_event(event) {
            self.report(&e);
            return;
        }

        let after = self.controller.state();

        if is_tick {
            self.show_readout();
        } else if finishing && after.is_idle() {
            if before.is_recording() {
                let count = self.controller.entries().len();
                self.output.line(format!(
                    "Saved {}.",
                    Library::label(count.saturating_sub(1))
                ));
            } else {
                self.output.line("Playback finished.");
            }
        } else if is_route_change && !before.is_idle() {
            if self.controller.is_finalizing() {
                self.output.line("Audio route changed, stopping.");
            } else if before != after {
                self.output.line(format!("Audio route changed, now {}.", after));
            }
        }
    }

    /// Print the consent question and hold the reply until the next line.
    pub(crate) fn ask_consent(&mut self, reply: PermissionReply) {
        if let Some(previous) = self.pending_consent.replace(reply) {
            previous.resolve(false);
        }
        self.output
            .line("Allow Voice Memo to use your microphone? [y/n]");
    }

    /// Resolve the held consent request from a y/n line and remember it.
    fn answer_consent(&mut self, line: &str) {
        let Some(granted) = parse_consent(line) else {
            self.output.line("Please answer y or n.");
            return;
        };

        if let Some(reply) = self.pending_consent.take() {
            reply.resolve(granted);
        }

        self.config.behaviour.microphone_access = Some(granted);
        if let Err(e) = self.config.save(&self.config_path) {
            error!(error = ?e, "Failed to remember microphone consent");
        }

        self.output.line(if granted {
            "Microphone access allowed."
        } else {
            "Microphone access refused. Change behaviour.microphone_access in the config to allow it."
        });
    }

    fn show_readout(&mut self) {
        let state = self.controller.state();
        if !state.is_idle() {
            self.output
                .readout(state, self.controller.elapsed_display());
        }
    }

    fn report(&mut self, e: &SessionError) {
        warn!(error = %e, "Session operation failed");
        self.output.notice(&e.notice());
    }

    /// Stop the route monitor and give an active cycle a bounded time to finish.
    #[instrument(skip(self))]
    pub(crate) async fn shutdown(&mut self) {
        if let Some(monitor) = self.route_monitor.take() {
            monitor.stop();
        }

        if let Some(reply) = self.pending_consent.take() {
            reply.resolve(false);
        }

        match self.controller.stop_active() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                self.report(&e);
                return;
            }
        }

        let controller = &mut self.controller;
        let events_rx = &mut self.events_rx;
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            let mut failures = Vec::new();
            while !controller.state().is_idle() {
                let Some(event) = events_rx.recv().await else {
                    break;
                };
                if let Err(e) = controller.handle_event(event) {
                    failures.push(e);
                }
            }
            failures
        })
        .await;

        match drained {
            Ok(failures) => {
                for e in &failures {
                    self.report(e);
                }
                info!("Active cycle finished before exit");
            }
            Err(_) => warn!(
                timeout_ms = SHUTDOWN_GRACE.as_millis(),
                "Active cycle did not finish before exit"
            ),
        }
    }
}
