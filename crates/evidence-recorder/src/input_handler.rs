//! Line-oriented command input.
//!
//! Reads commands from stdin on a blocking task and forwards parsed
//! [`AppCommand`]s to the main application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{
    io::{self, BufRead},
    panic::Location,
};

use error_location::ErrorLocation;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, instrument, warn};

/// Forwards typed commands from an input stream to the application.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Forward stdin on a single persistent blocking task.
    ///
    /// Stops at end of input, after sending [`AppCommand::Shutdown`], or as
    /// soon as the receiving side is gone.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            // A failed send only means the app is already gone.
            if let Err(e) = self.forward(stdin.lock()) {
                debug!(error = ?e, "Input forwarder stopping");
            }
        })
    }

    /// Parse and forward every line of `reader`. Must not run on an async
    /// worker thread.
    #[instrument(skip_all)]
    pub fn forward(&self, reader: impl BufRead) -> AppResult<()> {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = ?e, "Failed to read input");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<AppCommand>() {
                Ok(command) => {
                    let is_shutdown = command == AppCommand::Shutdown;
                    self.send(command)?;
                    if is_shutdown {
                        return Ok(());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Rejected input");
                    println!("{}", e);
                }
            }
        }

        debug!("End of input, requesting shutdown");
        self.send(AppCommand::Shutdown)
    }

    #[track_caller]
    fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .blocking_send(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to forward {:?}", e.0),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
