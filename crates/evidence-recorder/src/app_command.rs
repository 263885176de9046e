use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Fault reported by `fail` when no reason is given.
const DEFAULT_FAULT_REASON: &str = "simulated capture fault";

/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording session.
    Start,
    /// Pause the current recording.
    Pause,
    /// Resume a paused recording.
    Resume,
    /// Stop and keep the recording.
    Save,
    /// Stop and throw the recording away.
    Discard,
    /// Observe a recorder that may already be running.
    Bind,
    /// Stop observing without stopping the recorder.
    Unbind,
    /// Change how many amplitude samples are kept.
    Capacity(usize),
    /// Print the current status line.
    Status,
    /// Make the simulated recorder report a capture error.
    Fail(String),
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// One line per command, shown by `help`.
    pub const USAGE: &'static str = "\
start             begin a new recording
pause | resume    pause or continue the recording
save              stop and keep the recording
discard           stop and delete the recording
bind | unbind     observe a running recorder, or stop observing
capacity <n>      keep the last <n> amplitude samples
status            print the current status
fail [reason]     simulate a capture error
quit              stop (saving any recording) and exit";
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };

        let caller = Location::caller();
        let invalid = |reason: &str| AppError::InvalidCommand {
            input: trimmed.to_string(),
            reason: reason.to_string(),
            location: ErrorLocation::from(caller),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" | "record" => AppCommand::Start,
            "pause" => AppCommand::Pause,
            "resume" => AppCommand::Resume,
            "save" | "stop" => AppCommand::Save,
            "discard" | "delete" => AppCommand::Discard,
            "bind" => AppCommand::Bind,
            "unbind" => AppCommand::Unbind,
            "status" => AppCommand::Status,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" => AppCommand::Shutdown,
            "fail" if rest.is_empty() => AppCommand::Fail(DEFAULT_FAULT_REASON.to_string()),
            "fail" => AppCommand::Fail(rest.to_string()),
            "capacity" => {
                let capacity = rest
                    .parse::<usize>()
                    .map_err(|_| invalid("capacity needs a whole number"))?;
                AppCommand::Capacity(capacity)
            }
            "" => return Err(invalid("empty input")),
            _ => return Err(invalid("unknown command, try `help`")),
        };

        let takes_argument = matches!(command, AppCommand::Capacity(_) | AppCommand::Fail(_));
        if !takes_argument && !rest.is_empty() {
            return Err(invalid("command takes no arguments"));
        }

        Ok(command)
    }
}
