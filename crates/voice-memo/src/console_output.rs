use std::{fmt::Display, io::Write};

use tracing::warn;
use voice_memo_core::{Library, Notice, SessionState};

/// Command summary printed by `help`.
pub(crate) const HELP_TEXT: &str = "\
Commands:
  record, r        start recording, or stop what is running
  stop, s          stop recording or playback
  pause, p         pause or resume
  play N           play recording N
  delete N, rm N   delete recording N
  list, ls         list recordings
  status           show the current state
  help, ?          show this help
  quit, q          stop and exit";

/// Writes user-facing lines. Logging goes to stderr, this goes to `out`.
pub struct ConsoleOutput<W: Write> {
    out: W,
    last_readout: Option<String>,
}

impl<W: Write> ConsoleOutput<W> {
    /// Output writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_readout: None,
        }
    }

    /// Writes one line.
    pub fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    /// Prints the readout if it differs from the last one printed.
    pub fn readout(&mut self, state: SessionState, display: &str) {
        let text = format!("[{}] {}", state, display);
        if self.last_readout.as_deref() == Some(text.as_str()) {
            return;
        }
        self.line(&text);
        self.last_readout = Some(text);
    }

    /// Prints the state and readout unconditionally.
    pub fn status(&mut self, state: SessionState, display: &str, entries: usize) {
        self.line(format!(
            "State: {}  Elapsed: {}  Recordings: {}",
            state, display, entries
        ));
    }

    /// Prints a single notice for a failure.
    pub fn notice(&mut self, notice: &Notice) {
        self.line(format!("{}: {}", notice.title, notice.message));
    }

    /// Prints the numbered recording list.
    pub fn listing(&mut self, entries: &[String]) {
        if entries.is_empty() {
            self.line("No recordings yet. Type `record` to start one.");
            return;
        }
        for (index, name) in entries.iter().enumerate() {
            self.line(format!("{:>3}. {}  ({})", index + 1, Library::label(index), name));
        }
    }

    /// Prints the command summary.
    pub fn help(&mut self) {
        self.line(HELP_TEXT);
    }

    /// Forgets the last readout so the next one is printed even if equal.
    pub fn reset_readout(&mut self) {
        self.last_readout = None;
    }

    /// The underlying writer.
    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
