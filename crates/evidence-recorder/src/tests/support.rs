use crate::{
    config::{Config, RecordingConfig, StorageConfig},
    simulation::{LocalHost, SimulationSettings},
};

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use evidence_recorder_core::{SessionConfig, SessionController};
use uuid::Uuid;

pub(crate) const TEST_TICK: Duration = Duration::from_millis(10);
pub(crate) const TEST_MAX_DURATION: Duration = Duration::from_secs(60);
pub(crate) const TEST_AMPLITUDE_CAPACITY: usize = 8;

/// Upper bound for waiting on the simulated recorder.
pub(crate) const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Fresh, not yet created directory under the system temp dir.
pub(crate) fn temp_recordings_dir() -> PathBuf {
    std::env::temp_dir().join(format!("evidence-recorder-test-{}", Uuid::new_v4()))
}

pub(crate) fn test_settings(recordings_dir: &Path) -> SimulationSettings {
    SimulationSettings {
        recordings_dir: recordings_dir.to_path_buf(),
        max_duration: TEST_MAX_DURATION,
        tick_interval: TEST_TICK,
        amplitude_capacity: TEST_AMPLITUDE_CAPACITY,
        connect_delay: Duration::ZERO,
    }
}

pub(crate) fn test_config(recordings_dir: &Path) -> Config {
    Config {
        recording: RecordingConfig {
            max_duration_secs: TEST_MAX_DURATION.as_secs(),
            amplitude_capacity: TEST_AMPLITUDE_CAPACITY,
            tick_interval_ms: TEST_TICK.as_millis() as u64,
        },
        storage: StorageConfig {
            recordings_dir: recordings_dir.to_path_buf(),
        },
    }
}

pub(crate) fn simulated_controller(recordings_dir: &Path) -> SessionController<LocalHost> {
    let host = LocalHost::new(test_settings(recordings_dir));
    SessionController::new(
        host,
        SessionConfig {
            max_duration: TEST_MAX_DURATION,
            amplitude_capacity: TEST_AMPLITUDE_CAPACITY,
        },
    )
}

/// Handle controller events until `done` holds or the wait limit passes.
pub(crate) async fn drive_until(
    controller: &mut SessionController<LocalHost>,
    mut done: impl FnMut(&SessionController<LocalHost>) -> bool,
) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    while !done(controller) {
        match tokio::time::timeout_at(deadline, controller.next_event()).await {
            Ok(Some(event)) => controller.handle_event(event),
            Ok(None) | Err(_) => return false,
        }
    }
    true
}

/// Artifact descriptors written into `dir`.
pub(crate) fn artifact_files(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn remove_dir(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}
