use crate::config::{
    DEFAULT_MAX_DURATION_SECS, DEFAULT_TICK_INTERVAL_MS, default_amplitude_capacity,
    default_max_duration_secs, default_tick_interval_ms,
};

use std::time::Duration;

use evidence_recorder_core::{DEFAULT_AMPLITUDE_CAPACITY, SessionConfig};
use serde::{Deserialize, Serialize};

/// Recording session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Recording ceiling in seconds, used for progress.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,

    /// Number of amplitude samples shown by the visualizer.
    #[serde(default = "default_amplitude_capacity")]
    pub amplitude_capacity: usize,

    /// How often the simulated recorder advances, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl RecordingConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Controller settings derived from this section.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_duration: self.max_duration(),
            amplitude_capacity: self.amplitude_capacity,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            amplitude_capacity: DEFAULT_AMPLITUDE_CAPACITY,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}
