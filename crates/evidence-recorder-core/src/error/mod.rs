use error_location::ErrorLocation;
use thiserror::Error;

/// Session synchronization errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// An intent that needs a live backend was issued while detached.
    ///
    /// This is a contract bug between presenter and controller, not a
    /// runtime condition, so it is returned rather than absorbed.
    #[error("No recorder backend attached for {operation} {location}")]
    NotConnected {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host had no binding to release.
    #[error("Recorder backend not bound {location}")]
    NotBound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Binding to or unbinding from the backend failed.
    #[error("Recorder connection failed: {reason} {location}")]
    ConnectionFailed {
        /// Description of the connection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The host could not launch the backend as a background task.
    #[error("Failed to launch recorder backend: {reason} {location}")]
    LaunchFailed {
        /// Description of the launch failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend reported an internal capture fault.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailed {
        /// Backend-provided description of the fault.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The backend could not finalize the recording into an artifact.
    #[error("Failed to finalize recording: {reason} {location}")]
    FinalizeFailed {
        /// Description of the finalize failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Any other backend operation failed.
    #[error("Recorder backend error: {reason} {location}")]
    BackendFailed {
        /// Description of the backend failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether this error only signals that nothing was bound.
    ///
    /// Unbind paths treat this as expected.
    pub fn is_not_bound(&self) -> bool {
        matches!(self, SessionError::NotBound { .. })
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
