use crate::{
    CoreResult,
    backend::BackendListener,
    session::{Amplitude, ArtifactRef, RecorderState},
};

use std::time::Duration;

/// Consistent read of backend state taken when a connection is established.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendSnapshot {
    /// Current capture state.
    pub state: RecorderState,
    /// Time captured so far.
    pub elapsed: Duration,
    /// Recent amplitude samples, most recent last.
    pub amplitudes: Vec<Amplitude>,
    /// Ceiling configured on the backend, if it has one.
    pub max_duration: Option<Duration>,
}

/// The long-lived component that actually captures audio.
///
/// Implementations live outside this crate and may run on any thread, so
/// every method takes `&self` and the trait requires `Send + Sync`.
/// Notifications flow back through the [`BackendListener`] installed with
/// [`set_listener`](Self::set_listener).
pub trait RecorderBackend: Send + Sync + 'static {
    /// Begins capturing. Must be a no-op when capture is already running or
    /// paused, since observers reattaching to a live backend also call it.
    fn start_capturing(&self) -> CoreResult<()>;

    /// Requests a state change. The backend confirms through
    /// [`BackendListener::state_changed`].
    fn change_state(&self, state: RecorderState) -> CoreResult<()>;

    /// Finalizes the current recording and returns a reference to it.
    fn finalize_and_get_artifact(&self) -> CoreResult<ArtifactRef>;

    /// Current state, elapsed time, amplitudes and configured ceiling.
    fn snapshot(&self) -> BackendSnapshot;

    /// Number of amplitude samples the backend keeps and pushes.
    fn set_amplitude_capacity(&self, capacity: usize) -> CoreResult<()>;

    /// Installs the push channel, replacing any previous one.
    /// `None` detaches the current listener.
    fn set_listener(&self, listener: Option<BackendListener>);
}
