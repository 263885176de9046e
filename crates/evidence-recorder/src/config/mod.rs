mod recording_config;
#[allow(clippy::module_inception)]
mod config;
mod storage_config;

pub(crate) use {
    config::Config, recording_config::RecordingConfig, storage_config::StorageConfig,
};

use evidence_recorder_core::{DEFAULT_AMPLITUDE_CAPACITY, DEFAULT_MAX_DURATION};

pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = DEFAULT_MAX_DURATION.as_secs();
pub(crate) const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_amplitude_capacity() -> usize {
    DEFAULT_AMPLITUDE_CAPACITY
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}
