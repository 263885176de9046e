mod amplitude_history;
mod artifact;
mod recorder_state;
mod recording_session;

pub use {
    amplitude_history::{Amplitude, AmplitudeHistory, DEFAULT_AMPLITUDE_CAPACITY},
    artifact::ArtifactRef,
    recorder_state::RecorderState,
    recording_session::RecordingSession,
};
