use crate::config::Config;

use std::{path::PathBuf, time::Duration};

/// Knobs for the simulated recorder.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub recordings_dir: PathBuf,
    pub max_duration: Duration,
    pub tick_interval: Duration,
    /// Samples kept until the controller sets its own capacity.
    pub amplitude_capacity: usize,
    /// Delay before a connect request is answered.
    pub connect_delay: Duration,
}

impl From<&Config> for SimulationSettings {
    fn from(config: &Config) -> Self {
        Self {
            recordings_dir: config.storage.recordings_dir.clone(),
            max_duration: config.recording.max_duration(),
            tick_interval: config.recording.tick_interval(),
            amplitude_capacity: config.recording.amplitude_capacity,
            connect_delay: Duration::from_millis(50),
        }
    }
}
