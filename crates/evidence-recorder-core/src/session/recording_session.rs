use crate::{
    backend::BackendSnapshot,
    session::{Amplitude, AmplitudeHistory, ArtifactRef, RecorderState},
};

use std::time::Duration;

/// Authoritative UI-facing state of one recording session.
///
/// Presenters only ever see immutable copies of this struct published by
/// the [`SessionController`](crate::SessionController). Every mutator is
/// crate-private and keeps these invariants:
///
/// - `elapsed` is `Some` iff `state != Idle`
/// - the amplitude history never exceeds its capacity
/// - `last_saved_artifact` is written at most once between resets, and
///   only [`begin`](Self::begin) clears it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSession {
    state: RecorderState,
    elapsed: Option<Duration>,
    amplitude_history: AmplitudeHistory,
    max_duration: Duration,
    last_saved_artifact: Option<ArtifactRef>,
    artifact_recorded: bool,
}

impl RecordingSession {
    pub(crate) fn new(max_duration: Duration, amplitude_capacity: usize) -> Self {
        Self {
            state: RecorderState::Idle,
            elapsed: None,
            amplitude_history: AmplitudeHistory::new(amplitude_capacity),
            max_duration,
            last_saved_artifact: None,
            artifact_recorded: false,
        }
    }

    /// Mirrored backend state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Time captured so far. `None` while idle.
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Recent amplitude samples, most recent last.
    pub fn amplitude_history(&self) -> &AmplitudeHistory {
        &self.amplitude_history
    }

    /// Recording ceiling used for [`progress`](Self::progress).
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Recording finalized by the last explicit save or error recovery.
    pub fn last_saved_artifact(&self) -> Option<&ArtifactRef> {
        self.last_saved_artifact.as_ref()
    }

    /// Fraction of `max_duration` already captured, clamped to `[0, 1]`.
    ///
    /// Idle sessions and a zero ceiling report `0.0`.
    pub fn progress(&self) -> f32 {
        let Some(elapsed) = self.elapsed else {
            return 0.0;
        };

        if self.max_duration.is_zero() {
            return 0.0;
        }

        let ratio = elapsed.as_secs_f64() / self.max_duration.as_secs_f64();
        ratio.clamp(0.0, 1.0) as f32
    }

    /// Whether capture is currently suspended.
    pub fn is_paused(&self) -> bool {
        self.state == RecorderState::Paused
    }

    /// Whether audio is currently being captured.
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Whether a session is open with a known elapsed time.
    pub fn is_in_recording(&self) -> bool {
        self.state != RecorderState::Idle && self.elapsed.is_some()
    }

    pub(crate) fn set_state(&mut self, state: RecorderState) {
        self.state = state;

        if state == RecorderState::Idle {
            self.elapsed = None;
        } else if self.elapsed.is_none() {
            self.elapsed = Some(Duration::ZERO);
        }
    }

    /// Elapsed pushes that arrive while idle are dropped to keep the
    /// `elapsed`/`state` invariant.
    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) -> bool {
        if self.state == RecorderState::Idle {
            return false;
        }
        self.elapsed = Some(elapsed);
        true
    }

    pub(crate) fn replace_amplitudes(&mut self, samples: &[Amplitude]) {
        self.amplitude_history.replace_with(samples);
    }

    pub(crate) fn push_amplitude(&mut self, sample: Amplitude) {
        self.amplitude_history.push(sample);
    }

    pub(crate) fn set_amplitude_capacity(&mut self, capacity: usize) {
        self.amplitude_history.set_capacity(capacity);
    }

    pub(crate) fn set_max_duration(&mut self, max_duration: Duration) {
        self.max_duration = max_duration;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: &BackendSnapshot) {
        self.set_state(snapshot.state);
        self.set_elapsed(snapshot.elapsed);
        self.replace_amplitudes(&snapshot.amplitudes);
        if let Some(max_duration) = snapshot.max_duration {
            self.max_duration = max_duration;
        }
    }

    /// Stores the artifact unless one was already recorded since the last
    /// reset.
    pub(crate) fn record_artifact(&mut self, artifact: ArtifactRef) -> bool {
        if self.artifact_recorded {
            return false;
        }
        self.last_saved_artifact = Some(artifact);
        self.artifact_recorded = true;
        true
    }

    /// Back to idle. The saved artifact survives so the presenter can
    /// still show it after a stop.
    pub(crate) fn reset(&mut self) {
        self.state = RecorderState::Idle;
        self.elapsed = None;
        self.amplitude_history.clear();
        self.artifact_recorded = false;
    }

    pub(crate) fn begin(&mut self) {
        self.reset();
        self.last_saved_artifact = None;
    }
}
