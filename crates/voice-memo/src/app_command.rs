use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands typed by the user, one per input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Start recording when idle, otherwise stop what is running.
    Record,
    /// Stop the active recording or playback.
    Stop,
    /// Pause or resume the active recording or playback.
    Pause,
    /// Play a recording.
    Play {
        /// 1-based position in the listing.
        number: usize,
    },
    /// Delete a recording and its file.
    Delete {
        /// 1-based position in the listing.
        number: usize,
    },
    /// Show all recordings.
    List,
    /// Show the session state and readout.
    Status,
    /// Show the command summary.
    Help,
    /// Leave the application.
    Quit,
}

impl UserCommand {
    /// Zero-based library index for `Play` and `Delete`.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Play { number } | Self::Delete { number } => number.checked_sub(1),
            _ => None,
        }
    }
}

impl FromStr for UserCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let mut words = input.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        let invalid = |reason: &str| AppError::InvalidCommand {
            input: input.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };

        if words.next().is_some() {
            return Err(invalid("too many arguments"));
        }

        let number = || -> Result<usize, AppError> {
            let raw = argument.ok_or_else(|| invalid("expected a recording number"))?;
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n),
                _ => Err(invalid("recording numbers start at 1")),
            }
        };

        let command = match verb.as_str() {
            "record" | "r" => Self::Record,
            "stop" | "s" => Self::Stop,
            "pause" | "p" => Self::Pause,
            "play" => {
                return number().map(|number| Self::Play { number });
            }
            "delete" | "rm" => {
                return number().map(|number| Self::Delete { number });
            }
            "list" | "ls" => Self::List,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "" => return Err(invalid("empty input")),
            _ => return Err(invalid("unknown command, type `help`")),
        };

        if argument.is_some() {
            return Err(invalid("this command takes no arguments"));
        }

        Ok(command)
    }
}
