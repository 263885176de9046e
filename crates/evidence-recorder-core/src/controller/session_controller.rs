use crate::{
    CoreResult, SessionError,
    backend::{
        BackendEvent, BackendHost, BackendListener, ConnectMode, ConnectRequest, ConnectionEvent,
        ConnectionSender, ConnectionToken, RecorderBackend,
    },
    controller::{CaptureFailure, ConnectIntent, Link, SessionConfig, hooks::Hooks},
    session::{AmplitudeHistory, ArtifactRef, RecorderState, RecordingSession},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, trace, warn};

/// Keeps a UI-facing [`RecordingSession`] in sync with a long-lived
/// recorder backend.
///
/// The controller is owned by a single task. User intents are plain method
/// calls on that task; everything the backend and host report arrives as a
/// [`ConnectionEvent`] on an internal channel and is applied only when the
/// owning task calls [`handle_event`](Self::handle_event) or
/// [`process_pending`](Self::process_pending). Presenters read immutable
/// snapshots from [`subscribe`](Self::subscribe).
///
/// # Connections
///
/// At most one connection exists at a time. Every connect request gets a
/// fresh [`ConnectionToken`], and results or notifications for any other
/// token are dropped, so releasing a connection while its attempt is still
/// in flight is safe.
///
/// # Example
///
/// ```ignore
/// let mut controller = SessionController::new(host, SessionConfig::default());
/// let mut snapshots = controller.subscribe();
///
/// controller.start()?;
/// loop {
///     tokio::select! {
///         Some(event) = controller.next_event() => controller.handle_event(event),
///         Ok(()) = snapshots.changed() => render(&snapshots.borrow()),
///     }
/// }
/// ```
pub struct SessionController<H: BackendHost> {
    host: H,
    link: Link,
    last_token: ConnectionToken,
    session: RecordingSession,
    amplitude_capacity: usize,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
    events_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
    snapshot_tx: watch::Sender<RecordingSession>,
    hooks: Hooks,
}

impl<H: BackendHost> SessionController<H> {
    /// Creates a detached controller with an idle session.
    pub fn new(host: H, config: SessionConfig) -> Self {
        let session = RecordingSession::new(config.max_duration, config.amplitude_capacity);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(session.clone());

        Self {
            host,
            link: Link::Detached,
            last_token: ConnectionToken::INITIAL,
            session,
            amplitude_capacity: config.amplitude_capacity,
            events_tx,
            events_rx,
            snapshot_tx,
            hooks: Hooks::default(),
        }
    }

    /// The connection layer this controller talks to.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Current session state.
    pub fn snapshot(&self) -> &RecordingSession {
        &self.session
    }

    /// Receiver of session snapshots, updated after every change.
    pub fn subscribe(&self) -> watch::Receiver<RecordingSession> {
        self.snapshot_tx.subscribe()
    }

    /// Whether a backend handle is currently attached.
    pub fn is_connected(&self) -> bool {
        self.link.backend().is_some()
    }

    /// Token of the current connect request, attached or still pending.
    pub fn connection_token(&self) -> Option<ConnectionToken> {
        self.link.token()
    }

    /// Registers the hook fired after a recording was saved by `stop`.
    pub fn on_saved(&mut self, hook: impl FnMut(&ArtifactRef) + Send + 'static) {
        self.hooks.saved = Some(Box::new(hook));
    }

    /// Registers the hook fired once per backend capture error.
    pub fn on_error(&mut self, hook: impl FnMut(&CaptureFailure) + Send + 'static) {
        self.hooks.error = Some(Box::new(hook));
    }

    /// Registers the hook fired whenever the amplitude history changes.
    pub fn on_amplitudes(&mut self, hook: impl FnMut(&AmplitudeHistory) + Send + 'static) {
        self.hooks.amplitudes = Some(Box::new(hook));
    }

    /// Starts a new recording session.
    ///
    /// Releases any stale connection, asks the host to launch the backend
    /// as a persistent task and requests a connection. The backend handle
    /// is only available once the matching `Connected` event is handled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LaunchFailed`] if the backend could not be
    /// launched. A rejected connect request is logged and leaves the
    /// controller detached.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<ConnectionToken> {
        self.release_connection();
        self.session.begin();
        self.publish();

        self.host.launch()?;

        let token = self.request_connection(ConnectIntent::Start, ConnectMode::AutoCreate);

        info!(token = %token, "Recording session requested");

        Ok(token)
    }

    /// Attaches to a backend that is already running without launching it.
    ///
    /// Keeps the last saved artifact; only [`start`](Self::start) clears it.
    #[instrument(skip(self))]
    pub fn bind(&mut self) -> ConnectionToken {
        self.release_connection();
        self.session.reset();
        self.publish();

        let token = self.request_connection(ConnectIntent::Observe, ConnectMode::ExistingOnly);

        info!(token = %token, "Observing recorder backend");

        token
    }

    /// Detaches from the backend. Succeeds when nothing is bound.
    #[instrument(skip(self))]
    pub fn unbind(&mut self) {
        self.release_connection();
        self.session.reset();
        self.publish();
    }

    /// Asks the backend to pause capture.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] without an attached backend.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<()> {
        self.attached_backend("pause")?
            .change_state(RecorderState::Paused)
    }

    /// Asks the backend to resume capture.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] without an attached backend.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        self.attached_backend("resume")?
            .change_state(RecorderState::Recording)
    }

    /// Ends the session.
    ///
    /// With `persist`, the backend finalizes the recording while still
    /// attached. The connection is then released, the backend shut down and
    /// the session reset, whether or not finalizing worked.
    ///
    /// # Errors
    ///
    /// Returns the finalize error after teardown has completed.
    #[instrument(skip(self))]
    pub fn stop(&mut self, persist: bool) -> CoreResult<Option<ArtifactRef>> {
        let finalized = match (persist, self.link.backend().cloned()) {
            (true, Some(backend)) => Some(backend.finalize_and_get_artifact()),
            (true, None) => {
                warn!("Stop with save requested but no backend attached; nothing to finalize");
                None
            }
            (false, _) => None,
        };

        let outcome = match finalized {
            Some(Ok(artifact)) => {
                self.store_artifact(&artifact);
                Ok(Some(artifact))
            }
            Some(Err(e)) => {
                error!(error = %e, "Failed to finalize recording");
                Err(e)
            }
            None => Ok(None),
        };

        self.teardown();

        if let Ok(Some(artifact)) = &outcome {
            info!(artifact_id = %artifact.id, path = ?artifact.path, "Recording saved");
            self.hooks.notify_saved(artifact);
        } else {
            info!(persist, "Recording stopped");
        }

        outcome
    }

    /// Ends the session without saving it.
    #[instrument(skip(self))]
    pub fn discard(&mut self) {
        self.teardown();
        info!("Recording discarded");
    }

    /// Changes how many amplitude samples are kept.
    ///
    /// Applied locally right away, forwarded when attached, and otherwise
    /// staged for the next connection.
    ///
    /// # Errors
    ///
    /// Returns the backend error if forwarding failed.
    #[instrument(skip(self))]
    pub fn set_amplitude_capacity(&mut self, capacity: usize) -> CoreResult<()> {
        self.amplitude_capacity = capacity;
        self.session.set_amplitude_capacity(capacity);
        self.publish();

        match self.link.backend() {
            Some(backend) => backend.set_amplitude_capacity(capacity),
            None => {
                debug!(capacity, "Amplitude capacity staged for next connection");
                Ok(())
            }
        }
    }

    /// Sets the recording ceiling used for progress until a backend
    /// snapshot provides its own.
    #[instrument(skip(self))]
    pub fn set_max_duration(&mut self, max_duration: Duration) {
        self.session.set_max_duration(max_duration);
        self.publish();
    }

    /// Waits for the next connection event.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` branch.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        self.events_rx.recv().await
    }

    /// Applies every queued event without waiting, including events queued
    /// while handling. Consecutive amplitude sequences from the same
    /// connection are coalesced into the latest one.
    ///
    /// Returns the number of events applied.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let mut queued = Vec::new();
            while let Ok(event) = self.events_rx.try_recv() {
                queued.push(event);
            }

            if queued.is_empty() {
                return handled;
            }

            let mut events = queued.into_iter().peekable();
            while let Some(event) = events.next() {
                if is_superseded_amplitudes(&event, events.peek()) {
                    trace!(token = %event.token(), "Coalesced amplitude update");
                    continue;
                }
                self.handle_event(event);
                handled += 1;
            }
        }
    }

    /// Applies one event from the connection layer or backend.
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected { token, backend } => self.on_connected(token, backend),
            ConnectionEvent::Disconnected { token } => self.on_disconnected(token),
            ConnectionEvent::Backend { token, event } => self.on_backend_event(token, event),
        }
    }

    #[instrument(skip(self, backend))]
    fn on_connected(&mut self, token: ConnectionToken, backend: Arc<dyn RecorderBackend>) {
        if self.link.token() != Some(token) {
            debug!(token = %token, "Ignoring connection for a superseded request");
            return;
        }
        let Some(intent) = self.link.intent() else {
            return;
        };

        if let Some(previous) = self.link.backend() {
            previous.set_listener(None);
        }

        backend.set_listener(Some(BackendListener::new(token, self.events_tx.clone())));

        if let Err(e) = backend.set_amplitude_capacity(self.amplitude_capacity) {
            warn!(error = %e, "Failed to forward amplitude capacity");
        }

        if let Err(e) = backend.start_capturing() {
            error!(error = %e, "Backend refused to start capturing");
        }

        let snapshot = backend.snapshot();
        self.session.apply_snapshot(&snapshot);
        self.link = Link::Attached {
            token,
            intent,
            backend,
        };
        self.publish();

        info!(
            token = %token,
            intent = ?intent,
            state = %snapshot.state,
            elapsed_ms = snapshot.elapsed.as_millis(),
            "Recorder backend connected"
        );
    }

    #[instrument(skip(self))]
    fn on_disconnected(&mut self, token: ConnectionToken) {
        if self.link.token() != Some(token) {
            debug!(token = %token, "Ignoring disconnect for a released connection");
            return;
        }
        let Some(intent) = self.link.intent() else {
            return;
        };

        if let Some(backend) = self.link.backend() {
            backend.set_listener(None);
        }

        // Still wanted: the host may reconnect a restarted backend.
        self.link = Link::Pending { token, intent };
        self.session.reset();
        self.publish();

        warn!(token = %token, "Recorder backend disconnected");
    }

    fn on_backend_event(&mut self, token: ConnectionToken, event: BackendEvent) {
        if self.link.attached_token() != Some(token) {
            trace!(token = %token, ?event, "Dropping event from a stale connection");
            return;
        }

        match event {
            BackendEvent::StateChanged(state) => {
                debug!(state = %state, "Backend state changed");
                self.session.set_state(state);
            }
            BackendEvent::ElapsedChanged(elapsed) => {
                if !self.session.set_elapsed(elapsed) {
                    trace!("Elapsed update while idle ignored");
                }
            }
            BackendEvent::AmplitudesChanged(samples) => {
                self.session.replace_amplitudes(&samples);
                self.hooks
                    .notify_amplitudes(self.session.amplitude_history());
            }
            BackendEvent::AmplitudeSampled(sample) => {
                self.session.push_amplitude(sample);
                self.hooks
                    .notify_amplitudes(self.session.amplitude_history());
            }
            BackendEvent::Error { reason } => {
                self.on_capture_error(reason);
                return;
            }
        }

        self.publish();
    }

    /// Saves what was captured before surfacing the error: a partially
    /// correct artifact beats losing the recording.
    #[instrument(skip(self))]
    fn on_capture_error(&mut self, reason: String) {
        error!(reason = %reason, "Recorder backend reported a capture error");

        let (artifact, finalize_error) = match self.link.backend().cloned() {
            Some(backend) => match backend.finalize_and_get_artifact() {
                Ok(artifact) => {
                    self.store_artifact(&artifact);
                    info!(artifact_id = %artifact.id, "Recording recovered after capture error");
                    (Some(artifact), None)
                }
                Err(e) => {
                    warn!(error = %e, "Best-effort finalize after capture error failed");
                    (None, Some(e))
                }
            },
            None => (None, None),
        };

        self.teardown();

        let failure = CaptureFailure {
            error: capture_failed(reason),
            artifact,
            finalize_error,
        };
        self.hooks.notify_error(&failure);
    }

    #[track_caller]
    fn attached_backend(&self, operation: &'static str) -> CoreResult<&Arc<dyn RecorderBackend>> {
        self.link.backend().ok_or_else(|| SessionError::NotConnected {
            operation,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn request_connection(&mut self, intent: ConnectIntent, mode: ConnectMode) -> ConnectionToken {
        let token = self.last_token.next();
        self.last_token = token;

        let request = ConnectRequest {
            token,
            mode,
            sender: ConnectionSender::new(token, self.events_tx.clone()),
        };

        match self.host.connect(request) {
            Ok(()) => {
                self.link = Link::Pending { token, intent };
                debug!(token = %token, mode = ?mode, "Connect request issued");
            }
            Err(e) => {
                self.link = Link::Detached;
                warn!(token = %token, error = %e, "Connect request rejected");
            }
        }

        token
    }

    /// Drops the current connection, if any. "Not bound" is expected here.
    fn release_connection(&mut self) {
        let token = match std::mem::replace(&mut self.link, Link::Detached) {
            Link::Detached => {
                trace!("No recorder connection to release");
                return;
            }
            Link::Pending { token, .. } => token,
            Link::Attached { token, backend, .. } => {
                backend.set_listener(None);
                token
            }
        };

        match self.host.disconnect(token) {
            Ok(()) => debug!(token = %token, "Recorder connection released"),
            Err(e) if e.is_not_bound() => debug!(token = %token, "Recorder connection was not bound"),
            Err(e) => warn!(token = %token, error = %e, "Failed to release recorder connection"),
        }
    }

    fn teardown(&mut self) {
        self.release_connection();

        if let Err(e) = self.host.shutdown() {
            warn!(error = %e, "Failed to shut down recorder backend");
        }

        self.session.reset();
        self.publish();
    }

    fn store_artifact(&mut self, artifact: &ArtifactRef) {
        if !self.session.record_artifact(artifact.clone()) {
            warn!(artifact_id = %artifact.id, "Session already has a saved artifact; keeping the first");
        }
    }

    fn publish(&self) {
        let session = &self.session;
        self.snapshot_tx.send_if_modified(|current| {
            if current == session {
                return false;
            }
            *current = session.clone();
            true
        });
    }
}

impl<H: BackendHost> Drop for SessionController<H> {
    fn drop(&mut self) {
        self.release_connection();
    }
}

fn is_superseded_amplitudes(current: &ConnectionEvent, next: Option<&ConnectionEvent>) -> bool {
    match (current, next) {
        (
            ConnectionEvent::Backend {
                token,
                event: BackendEvent::AmplitudesChanged(_),
            },
            Some(ConnectionEvent::Backend {
                token: next_token,
                event: BackendEvent::AmplitudesChanged(_),
            }),
        ) => token == next_token,
        _ => false,
    }
}

#[track_caller]
fn capture_failed(reason: String) -> SessionError {
    SessionError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
