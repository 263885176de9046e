use crate::{
    SessionError,
    session::{AmplitudeHistory, ArtifactRef},
};

use tracing::warn;

/// Delivered to the error hook once per backend capture error.
#[derive(Debug)]
pub struct CaptureFailure {
    /// The capture error reported by the backend.
    pub error: SessionError,
    /// Artifact produced by the best-effort finalize, if it succeeded.
    pub artifact: Option<ArtifactRef>,
    /// Why the best-effort finalize failed, if it did.
    pub finalize_error: Option<SessionError>,
}

impl CaptureFailure {
    /// Whether the in-progress audio was saved despite the failure.
    pub fn recording_saved(&self) -> bool {
        self.artifact.is_some()
    }
}

pub(crate) type SavedHook = Box<dyn FnMut(&ArtifactRef) + Send>;
pub(crate) type ErrorHook = Box<dyn FnMut(&CaptureFailure) + Send>;
pub(crate) type AmplitudeHook = Box<dyn FnMut(&AmplitudeHistory) + Send>;

/// Presenter callbacks. Registering a hook replaces the previous one.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) saved: Option<SavedHook>,
    pub(crate) error: Option<ErrorHook>,
    pub(crate) amplitudes: Option<AmplitudeHook>,
}

impl Hooks {
    pub(crate) fn notify_saved(&mut self, artifact: &ArtifactRef) {
        if let Some(hook) = self.saved.as_mut() {
            hook(artifact);
        }
    }

    pub(crate) fn notify_error(&mut self, failure: &CaptureFailure) {
        match self.error.as_mut() {
            Some(hook) => hook(failure),
            None => warn!(error = %failure.error, "Capture failure with no error hook registered"),
        }
    }

    pub(crate) fn notify_amplitudes(&mut self, history: &AmplitudeHistory) {
        if let Some(hook) = self.amplitudes.as_mut() {
            hook(history);
        }
    }
}
