//! Evidence Recorder Core Library
//!
//! Keeps a UI-facing recording session in sync with a long-lived recorder
//! backend that may outlive or restart independently of the UI.
//!
//! The [`SessionController`] owns the single backend connection, mirrors
//! everything the backend pushes into a [`RecordingSession`], and publishes
//! immutable snapshots for presenters. The backend itself and the layer
//! that launches and binds it are supplied by the application through the
//! [`RecorderBackend`] and [`BackendHost`] traits.
//!
//! # Example
//!
//! ```ignore
//! use evidence_recorder_core::{CoreResult, SessionConfig, SessionController};
//!
//! fn record(host: impl evidence_recorder_core::BackendHost) -> CoreResult<()> {
//!     let mut controller = SessionController::new(host, SessionConfig::default());
//!     controller.on_saved(|artifact| println!("Saved to {:?}", artifact.path));
//!
//!     controller.start()?;
//!     controller.process_pending();
//!     controller.pause()?;
//!     controller.process_pending();
//!
//!     controller.stop(true)?;
//!     Ok(())
//! }
//! ```

mod backend;
mod controller;
mod error;
mod session;

pub use {
    backend::{
        BackendEvent, BackendHost, BackendListener, BackendSnapshot, ConnectMode, ConnectRequest,
        ConnectionEvent, ConnectionSender, ConnectionToken, RecorderBackend,
    },
    controller::{CaptureFailure, DEFAULT_MAX_DURATION, SessionConfig, SessionController},
    error::{Result as CoreResult, SessionError},
    session::{
        Amplitude, AmplitudeHistory, ArtifactRef, DEFAULT_AMPLITUDE_CAPACITY, RecorderState,
        RecordingSession,
    },
};

#[cfg(test)]
mod tests;
