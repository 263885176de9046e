use crate::simulation::{SimulatedBackend, SimulationSettings};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use evidence_recorder_core::{
    BackendHost, ConnectMode, ConnectRequest, ConnectionSender, ConnectionToken, CoreResult,
    RecorderBackend, SessionError,
};
use tracing::{debug, error, info, instrument};

#[derive(Default)]
struct HostState {
    backend: Option<Arc<SimulatedBackend>>,
    bindings: HashMap<ConnectionToken, ConnectionSender>,
}

/// In-process host for the [`SimulatedBackend`].
///
/// Behaves like a service binder: `launch` keeps a backend alive until
/// `shutdown`, `connect` answers asynchronously, and bindings made in
/// existing-only mode are answered as soon as a backend gets launched.
#[derive(Clone)]
pub struct LocalHost {
    state: Arc<Mutex<HostState>>,
    settings: SimulationSettings,
}

impl LocalHost {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState::default())),
            settings,
        }
    }

    /// The running backend, if launched.
    pub fn backend(&self) -> Option<Arc<SimulatedBackend>> {
        self.lock().backend.clone()
    }

    /// Make the running backend report a capture fault.
    pub fn inject_fault(&self, reason: &str) -> bool {
        self.backend()
            .is_some_and(|backend| backend.inject_fault(reason))
    }

    /// Number of bindings not released yet.
    #[cfg(test)]
    pub fn live_bindings(&self) -> usize {
        self.lock().bindings.len()
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|e| {
            error!("Host state lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    #[track_caller]
    fn deliver(&self, sender: ConnectionSender, backend: Arc<SimulatedBackend>) -> CoreResult<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            SessionError::ConnectionFailed {
                reason: format!("No async runtime to deliver connection: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let delay = self.settings.connect_delay;
        runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let token = sender.token();
            let backend: Arc<dyn RecorderBackend> = backend;
            if !sender.connected(backend) {
                debug!(token = %token, "Controller gone before connection was delivered");
            }
        });

        Ok(())
    }
}

impl BackendHost for LocalHost {
    #[instrument(skip(self))]
    fn launch(&self) -> CoreResult<()> {
        let waiting = {
            let mut state = self.lock();
            if state.backend.is_some() {
                debug!("Recorder backend already running");
                return Ok(());
            }

            let backend = SimulatedBackend::spawn(self.settings.clone())?;
            state.backend = Some(Arc::clone(&backend));

            state
                .bindings
                .values()
                .cloned()
                .map(|sender| (sender, Arc::clone(&backend)))
                .collect::<Vec<_>>()
        };

        // Existing-only bindings made before the launch connect now.
        for (sender, backend) in waiting {
            self.deliver(sender, backend)?;
        }

        info!("Recorder backend launched");
        Ok(())
    }

    #[instrument(skip(self, request), fields(token = %request.token, mode = ?request.mode))]
    fn connect(&self, request: ConnectRequest) -> CoreResult<()> {
        let backend = {
            let mut state = self.lock();
            state
                .bindings
                .insert(request.token, request.sender.clone());
            state.backend.clone()
        };

        match (backend, request.mode) {
            (Some(backend), _) => self.deliver(request.sender, backend),
            (None, ConnectMode::AutoCreate) => {
                let backend = SimulatedBackend::spawn(self.settings.clone())?;
                self.lock().backend = Some(Arc::clone(&backend));
                self.deliver(request.sender, backend)
            }
            (None, ConnectMode::ExistingOnly) => {
                debug!("No recorder running; binding waits for a launch");
                Ok(())
            }
        }
    }

    #[track_caller]
    fn disconnect(&self, token: ConnectionToken) -> CoreResult<()> {
        match self.lock().bindings.remove(&token) {
            Some(_) => {
                debug!(token = %token, "Binding released");
                Ok(())
            }
            None => Err(SessionError::NotBound {
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    #[instrument(skip(self))]
    fn shutdown(&self) -> CoreResult<()> {
        let (backend, orphaned) = {
            let mut state = self.lock();
            let orphaned: Vec<ConnectionSender> = state.bindings.drain().map(|(_, s)| s).collect();
            (state.backend.take(), orphaned)
        };

        if let Some(backend) = backend {
            backend.halt();
            info!("Recorder backend shut down");
        }

        for sender in orphaned {
            sender.disconnected();
        }

        Ok(())
    }
}
