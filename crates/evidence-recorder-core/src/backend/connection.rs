use crate::backend::{BackendEvent, BackendListener, RecorderBackend};

use std::{fmt, sync::Arc};

use tokio::sync::mpsc;

/// Identifies one connect request.
///
/// Tokens increase monotonically per controller. Results and notifications
/// carrying anything but the current token are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionToken(u64);

impl ConnectionToken {
    pub(crate) const INITIAL: ConnectionToken = ConnectionToken(0);

    pub(crate) fn next(self) -> Self {
        ConnectionToken(self.0 + 1)
    }

    /// Raw counter value, for logging and host bookkeeping.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the owning task has to apply, in arrival order.
pub enum ConnectionEvent {
    /// The host established the connection requested with `token`.
    Connected {
        /// Token of the connect request this answers.
        token: ConnectionToken,
        /// Live backend handle.
        backend: Arc<dyn RecorderBackend>,
    },
    /// The connection for `token` was lost (backend crash or host teardown).
    Disconnected {
        /// Token of the lost connection.
        token: ConnectionToken,
    },
    /// A notification pushed by the backend.
    Backend {
        /// Token of the connection that installed the listener.
        token: ConnectionToken,
        /// The pushed notification.
        event: BackendEvent,
    },
}

impl ConnectionEvent {
    /// Token the event belongs to.
    pub fn token(&self) -> ConnectionToken {
        match self {
            ConnectionEvent::Connected { token, .. }
            | ConnectionEvent::Disconnected { token }
            | ConnectionEvent::Backend { token, .. } => *token,
        }
    }
}

impl fmt::Debug for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionEvent::Connected { token, .. } => f
                .debug_struct("Connected")
                .field("token", token)
                .finish_non_exhaustive(),
            ConnectionEvent::Disconnected { token } => f
                .debug_struct("Disconnected")
                .field("token", token)
                .finish(),
            ConnectionEvent::Backend { token, event } => f
                .debug_struct("Backend")
                .field("token", token)
                .field("event", event)
                .finish(),
        }
    }
}

/// Delivers the outcome of one connect request back to the controller.
///
/// Hosts keep this around for as long as the binding exists and may call
/// [`connected`](Self::connected) again after a
/// [`disconnected`](Self::disconnected) when a restarted backend comes back.
#[derive(Debug, Clone)]
pub struct ConnectionSender {
    token: ConnectionToken,
    tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl ConnectionSender {
    pub(crate) fn new(token: ConnectionToken, tx: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        Self { token, tx }
    }

    /// Token of the request this sender answers.
    pub fn token(&self) -> ConnectionToken {
        self.token
    }

    /// Reports an established connection. Returns `false` once the
    /// controller is gone.
    pub fn connected(&self, backend: Arc<dyn RecorderBackend>) -> bool {
        self.tx
            .send(ConnectionEvent::Connected {
                token: self.token,
                backend,
            })
            .is_ok()
    }

    /// Reports a lost connection.
    pub fn disconnected(&self) -> bool {
        self.tx
            .send(ConnectionEvent::Disconnected { token: self.token })
            .is_ok()
    }

    /// Builds a push channel for a backend bound through this request.
    pub fn listener(&self) -> BackendListener {
        BackendListener::new(self.token, self.tx.clone())
    }
}
