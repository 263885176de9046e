use crate::simulation::SimulationSettings;

use std::{
    collections::VecDeque,
    fs,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use error_location::ErrorLocation;
use evidence_recorder_core::{
    Amplitude, ArtifactRef, BackendListener, BackendSnapshot, CoreResult, RecorderBackend,
    RecorderState, SessionError,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Peak value of synthesized samples, matching 16-bit recorder amplitudes.
const MAX_SYNTH_AMPLITUDE: f32 = 32_767.0;

struct Inner {
    state: RecorderState,
    elapsed: Duration,
    amplitudes: VecDeque<Amplitude>,
    capacity: usize,
    listener: Option<BackendListener>,
    ticker: Option<JoinHandle<()>>,
    ticks: u64,
}

/// Recorder backend that fakes capture on a timer.
///
/// A ticker task advances elapsed time and synthesizes one amplitude per
/// tick while recording. It only holds a weak reference, so dropping the
/// last handle ends it on the next tick.
pub struct SimulatedBackend {
    inner: Mutex<Inner>,
    settings: SimulationSettings,
}

impl SimulatedBackend {
    /// Create the backend and start its ticker on the current runtime.
    #[track_caller]
    pub fn spawn(settings: SimulationSettings) -> CoreResult<Arc<Self>> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| SessionError::LaunchFailed {
            reason: format!("No async runtime for recorder ticker: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tick_interval = settings.tick_interval;
        let capacity = settings.amplitude_capacity;
        let backend = Arc::new(Self {
            inner: Mutex::new(Inner {
                state: RecorderState::Idle,
                elapsed: Duration::ZERO,
                amplitudes: VecDeque::with_capacity(capacity),
                capacity,
                listener: None,
                ticker: None,
                ticks: 0,
            }),
            settings,
        });

        let weak = Arc::downgrade(&backend);
        let ticker = runtime.spawn(run_ticker(weak, tick_interval));
        backend.lock().ticker = Some(ticker);

        info!(tick_ms = tick_interval.as_millis(), "Simulated recorder launched");

        Ok(backend)
    }

    /// Report a capture fault the way a failing encoder would.
    #[instrument(skip(self))]
    pub fn inject_fault(&self, reason: &str) -> bool {
        let inner = self.lock();
        match inner.listener.as_ref() {
            Some(listener) => listener.error(reason),
            None => {
                warn!("No listener attached; fault not delivered");
                false
            }
        }
    }

    /// Stop the ticker and return to idle. Called by the host on shutdown.
    pub fn halt(&self) {
        let mut inner = self.lock();
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
        inner.state = RecorderState::Idle;
        inner.elapsed = Duration::ZERO;
        inner.amplitudes.clear();
        inner.listener = None;
        debug!("Simulated recorder halted");
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| {
            error!("Recorder state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn tick(&self) {
        let mut inner = self.lock();
        if inner.state != RecorderState::Recording {
            return;
        }

        inner.elapsed += self.settings.tick_interval;
        inner.ticks += 1;

        let sample = synthesize_amplitude(inner.ticks);
        inner.amplitudes.push_back(sample);
        while inner.amplitudes.len() > inner.capacity {
            inner.amplitudes.pop_front();
        }

        if let Some(listener) = inner.listener.as_ref() {
            listener.elapsed_changed(inner.elapsed);
            listener.amplitudes_changed(inner.amplitudes.iter().copied().collect());
        }
    }
}

impl RecorderBackend for SimulatedBackend {
    fn start_capturing(&self) -> CoreResult<()> {
        let mut inner = self.lock();
        if inner.state != RecorderState::Idle {
            return Ok(());
        }

        inner.state = RecorderState::Recording;
        if let Some(listener) = inner.listener.as_ref() {
            listener.state_changed(RecorderState::Recording);
        }

        info!("Simulated capture started");
        Ok(())
    }

    #[track_caller]
    fn change_state(&self, state: RecorderState) -> CoreResult<()> {
        let mut inner = self.lock();
        if inner.state == RecorderState::Idle {
            return Err(SessionError::BackendFailed {
                reason: format!("Cannot switch to {} before capture started", state),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        inner.state = state;
        if let Some(listener) = inner.listener.as_ref() {
            listener.state_changed(state);
        }

        debug!(state = %state, "Simulated recorder state changed");
        Ok(())
    }

    #[track_caller]
    fn finalize_and_get_artifact(&self) -> CoreResult<ArtifactRef> {
        let elapsed = self.lock().elapsed;
        let dir = &self.settings.recordings_dir;

        let id = Uuid::new_v4();
        let artifact = ArtifactRef {
            id,
            path: dir.join(format!("{}.toml", id)),
            duration: elapsed,
        };

        let contents = toml::to_string_pretty(&artifact).map_err(|e| SessionError::FinalizeFailed {
            reason: format!("Failed to serialize artifact: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::create_dir_all(dir)
            .and_then(|()| fs::write(&artifact.path, contents))
            .map_err(|e| SessionError::FinalizeFailed {
                reason: format!("Failed to write {:?}: {}", artifact.path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            artifact_id = %artifact.id,
            duration_ms = elapsed.as_millis(),
            "Simulated recording finalized"
        );

        Ok(artifact)
    }

    fn snapshot(&self) -> BackendSnapshot {
        let inner = self.lock();
        BackendSnapshot {
            state: inner.state,
            elapsed: inner.elapsed,
            amplitudes: inner.amplitudes.iter().copied().collect(),
            max_duration: Some(self.settings.max_duration),
        }
    }

    fn set_amplitude_capacity(&self, capacity: usize) -> CoreResult<()> {
        let mut inner = self.lock();
        inner.capacity = capacity;
        while inner.amplitudes.len() > capacity {
            inner.amplitudes.pop_front();
        }
        Ok(())
    }

    fn set_listener(&self, listener: Option<BackendListener>) {
        self.lock().listener = listener;
    }
}

async fn run_ticker(backend: Weak<SimulatedBackend>, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    // First tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(backend) = backend.upgrade() else {
            break;
        };
        backend.tick();
    }
}

/// Deterministic speech-like envelope: a slow swell with a faster flutter.
pub(crate) fn synthesize_amplitude(tick: u64) -> Amplitude {
    let t = tick as f32;
    let swell = (t * 0.13).sin().abs();
    let flutter = 0.5 + 0.5 * (t * 1.7).sin();
    (swell * flutter * MAX_SYNTH_AMPLITUDE) as Amplitude
}
