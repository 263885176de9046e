use crate::{
    CoreResult,
    backend::{ConnectionSender, ConnectionToken},
};

/// How a connect request treats a backend that is not running yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Create the backend if needed (used by `start`).
    AutoCreate,
    /// Only attach to a backend that is already running (used by `bind`).
    ExistingOnly,
}

/// A request to connect to the recorder backend.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// Token identifying this attempt.
    pub token: ConnectionToken,
    /// Whether the host may create the backend.
    pub mode: ConnectMode,
    /// Channel for the asynchronous outcome.
    pub sender: ConnectionSender,
}

/// The connection layer between the controller and the backend process.
///
/// Mirrors a platform service-binding API: launching a persistent
/// background task, binding and unbinding, and stopping it. Connect results
/// are never returned synchronously; they arrive later through the
/// request's [`ConnectionSender`].
pub trait BackendHost: Send + Sync + 'static {
    /// Starts the backend as a persistent background task.
    fn launch(&self) -> CoreResult<()>;

    /// Requests a connection. Returning `Ok` only means the request was
    /// accepted.
    fn connect(&self, request: ConnectRequest) -> CoreResult<()>;

    /// Releases the binding made for `token`. Fails with
    /// [`SessionError::NotBound`](crate::SessionError::NotBound) when there
    /// is nothing to release.
    fn disconnect(&self, token: ConnectionToken) -> CoreResult<()>;

    /// Asks the backend task to stop.
    fn shutdown(&self) -> CoreResult<()>;
}
