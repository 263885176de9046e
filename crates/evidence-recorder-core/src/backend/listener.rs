use crate::{
    backend::{ConnectionEvent, ConnectionToken},
    session::{Amplitude, RecorderState},
};

use std::time::Duration;

use tokio::sync::mpsc;

/// Notification pushed by a recorder backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// The backend entered a new state.
    StateChanged(RecorderState),
    /// Captured time advanced.
    ElapsedChanged(Duration),
    /// Full amplitude sequence, most recent last.
    AmplitudesChanged(Vec<Amplitude>),
    /// A single new amplitude sample.
    AmplitudeSampled(Amplitude),
    /// Capture failed inside the backend.
    Error {
        /// Backend-provided description of the fault.
        reason: String,
    },
}

/// Push channel handed to a backend on connect.
///
/// Every event is tagged with the connection token it was created for, so
/// events from a released connection are recognised and dropped by the
/// controller. Sending never blocks and never reorders.
#[derive(Debug, Clone)]
pub struct BackendListener {
    token: ConnectionToken,
    tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl BackendListener {
    pub(crate) fn new(token: ConnectionToken, tx: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        Self { token, tx }
    }

    /// Token of the connection this listener belongs to.
    pub fn token(&self) -> ConnectionToken {
        self.token
    }

    /// Pushes a state change. Returns `false` once the controller is gone.
    pub fn state_changed(&self, state: RecorderState) -> bool {
        self.send(BackendEvent::StateChanged(state))
    }

    /// Pushes a new elapsed time.
    pub fn elapsed_changed(&self, elapsed: Duration) -> bool {
        self.send(BackendEvent::ElapsedChanged(elapsed))
    }

    /// Pushes the full amplitude sequence.
    pub fn amplitudes_changed(&self, amplitudes: Vec<Amplitude>) -> bool {
        self.send(BackendEvent::AmplitudesChanged(amplitudes))
    }

    /// Pushes one amplitude sample.
    pub fn amplitude_sampled(&self, sample: Amplitude) -> bool {
        self.send(BackendEvent::AmplitudeSampled(sample))
    }

    /// Reports an internal capture fault.
    pub fn error(&self, reason: impl Into<String>) -> bool {
        self.send(BackendEvent::Error {
            reason: reason.into(),
        })
    }

    /// Pushes any backend event.
    pub fn send(&self, event: BackendEvent) -> bool {
        self.tx
            .send(ConnectionEvent::Backend {
                token: self.token,
                event,
            })
            .is_ok()
    }
}
