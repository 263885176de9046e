use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where finalized recordings are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory receiving recording artifacts.
    pub recordings_dir: PathBuf,
}
