use crate::{
    AppCommand, AppResult, Presenter,
    config::Config,
    presenter,
    simulation::{LocalHost, SimulationSettings},
};

use evidence_recorder_core::{RecordingSession, SessionController};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Main application state.
///
/// Owns the session controller and is the only task that issues intents.
/// Recorder notifications arrive through the controller's event channel and
/// are rendered from published snapshots.
pub struct App {
    pub(crate) controller: SessionController<LocalHost>,
    pub(crate) presenter: Presenter,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) snapshot_rx: watch::Receiver<RecordingSession>,
}

impl App {
    /// Build the application around a simulated recorder.
    pub fn new(config: &Config, command_rx: mpsc::Receiver<AppCommand>) -> Self {
        let host = LocalHost::new(SimulationSettings::from(config));
        let mut controller = SessionController::new(host, config.recording.session_config());

        controller.on_saved(|artifact| println!("{}", presenter::saved_line(artifact)));
        controller.on_error(|failure| println!("{}", presenter::failure_line(failure)));

        let snapshot_rx = controller.subscribe();

        Self {
            controller,
            presenter: Presenter::new(),
            command_rx,
            snapshot_rx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Evidence-Recorder starting");

        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    match self.handle_command(command) {
                        Ok(true) => {}
                        Ok(false) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Err(e) => {
                            error!(error = ?e, "Command failed");
                            println!("{}", e);
                        }
                    }
                }

                Some(event) = self.controller.next_event() => {
                    self.controller.handle_event(event);
                    self.controller.process_pending();
                }

                Ok(()) = self.snapshot_rx.changed() => {
                    self.render_snapshot();
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.shutdown();
        info!("Evidence-Recorder shut down successfully");

        Ok(())
    }

    /// Apply one command. Returns `false` when the app should exit.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, command: AppCommand) -> AppResult<bool> {
        match command {
            AppCommand::Start => {
                let token = self.controller.start()?;
                debug!(token = %token, "Recording requested");
            }
            AppCommand::Pause => self.controller.pause()?,
            AppCommand::Resume => self.controller.resume()?,
            AppCommand::Save => {
                if self.controller.stop(true)?.is_none() {
                    println!("Nothing to save");
                }
            }
            AppCommand::Discard => {
                self.controller.discard();
                println!("Recording discarded");
            }
            AppCommand::Bind => {
                let token = self.controller.bind();
                debug!(token = %token, "Observing recorder");
            }
            AppCommand::Unbind => self.controller.unbind(),
            AppCommand::Capacity(capacity) => self.controller.set_amplitude_capacity(capacity)?,
            AppCommand::Status => {
                println!("{}", presenter::status_line(self.controller.snapshot()));
            }
            AppCommand::Fail(reason) => {
                if !self.controller.host().inject_fault(&reason) {
                    println!("No recorder running");
                }
            }
            AppCommand::Help => println!("{}", AppCommand::USAGE),
            AppCommand::Shutdown => return Ok(false),
        }

        Ok(true)
    }

    fn render_snapshot(&mut self) {
        let line = {
            let session = self.snapshot_rx.borrow_and_update();
            self.presenter.render(&session)
        };
        if let Some(line) = line {
            println!("{}", line);
        }
    }

    /// Keep an in-progress recording, then release the recorder.
    fn shutdown(&mut self) {
        if self.controller.snapshot().is_in_recording() {
            match self.controller.stop(true) {
                Ok(Some(artifact)) => info!(artifact_id = %artifact.id, "Recording saved on exit"),
                Ok(None) => debug!("No recorder attached on exit"),
                Err(e) => warn!(error = ?e, "Failed to save recording on exit"),
            }
        }
        self.controller.unbind();
    }
}
