use crate::session::DEFAULT_AMPLITUDE_CAPACITY;

use std::time::Duration;

/// Default recording ceiling before a backend reports its own.
pub const DEFAULT_MAX_DURATION: Duration = Duration::from_secs(30 * 60);

/// Settings applied to every session a controller opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ceiling used for progress until a backend snapshot overrides it.
    pub max_duration: Duration,
    /// Number of amplitude samples kept for visualization.
    pub amplitude_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_DURATION,
            amplitude_capacity: DEFAULT_AMPLITUDE_CAPACITY,
        }
    }
}
