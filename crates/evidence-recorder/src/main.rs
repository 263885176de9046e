//! Evidence-Recorder: terminal front end for a background recording session.

mod app;
mod app_command;
mod config;
mod error;
mod input_handler;
mod presenter;
mod simulation;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
    presenter::Presenter,
};

use crate::config::Config;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info};

/// How long to wait for the stdin forwarder once the app has stopped.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("evidence_recorder=debug,evidence_recorder_core=info")
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    if let Err(e) = config.ensure_recordings_dir() {
        error!("Failed to prepare recordings directory: {:?}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    println!("{}", AppCommand::USAGE);

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);
        let app = App::new(&config, command_rx);

        // The forwarder blocks on stdin. It ends at end of input or when the
        // app drops `command_rx`, whichever comes first.
        let _input = InputHandler::new(command_tx).spawn();

        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
        }
    });

    // A stdin read cannot be interrupted, so don't wait on it forever.
    rt.shutdown_timeout(SHUTDOWN_GRACE);
    info!("Exited");
}
