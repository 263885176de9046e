use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to a finalized, persisted recording.
///
/// The storage layer decides what lives at `path`; this layer only carries
/// the reference back to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Unique identifier of the artifact.
    pub id: Uuid,
    /// Location where the recording was materialized.
    pub path: PathBuf,
    /// Captured length of the recording.
    pub duration: Duration,
}

impl ArtifactRef {
    /// Creates a reference with a fresh identifier.
    pub fn new(path: impl Into<PathBuf>, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            duration,
        }
    }
}
