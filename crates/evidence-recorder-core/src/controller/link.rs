use crate::backend::{ConnectionToken, RecorderBackend};

use std::sync::Arc;

/// Why the controller wants a backend connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectIntent {
    /// Launched by `start`.
    Start,
    /// Attached by `bind` to a backend that was already running.
    Observe,
}

/// The controller's single backend connection.
pub(crate) enum Link {
    Detached,
    /// Connect request issued, no handle yet (or the backend went away and
    /// the host may bring it back).
    Pending {
        token: ConnectionToken,
        intent: ConnectIntent,
    },
    Attached {
        token: ConnectionToken,
        intent: ConnectIntent,
        backend: Arc<dyn RecorderBackend>,
    },
}

impl Link {
    /// Token of the current request, attached or not.
    pub(crate) fn token(&self) -> Option<ConnectionToken> {
        match self {
            Link::Detached => None,
            Link::Pending { token, .. } | Link::Attached { token, .. } => Some(*token),
        }
    }

    pub(crate) fn intent(&self) -> Option<ConnectIntent> {
        match self {
            Link::Detached => None,
            Link::Pending { intent, .. } | Link::Attached { intent, .. } => Some(*intent),
        }
    }

    pub(crate) fn backend(&self) -> Option<&Arc<dyn RecorderBackend>> {
        match self {
            Link::Attached { backend, .. } => Some(backend),
            _ => None,
        }
    }

    pub(crate) fn attached_token(&self) -> Option<ConnectionToken> {
        match self {
            Link::Attached { token, .. } => Some(*token),
            _ => None,
        }
    }
}
