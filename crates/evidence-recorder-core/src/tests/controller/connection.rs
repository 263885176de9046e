use crate::{
    ConnectMode, RecorderState, SessionController,
    tests::support::{FakeBackend, FakeHost, connected_controller, test_config},
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

/// WHAT: Connecting synchronizes the session from the backend snapshot
/// WHY: The UI must not show empty data between connect and first push
#[test]
#[allow(clippy::unwrap_used)]
fn given_start_when_connected_with_recording_snapshot_then_session_recording_at_zero() {
    // Given: A started controller and a backend already recording
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    let token = controller.start().unwrap();
    let backend = FakeBackend::with_snapshot(RecorderState::Recording, Duration::ZERO);

    // When: The connection completes
    host.complete(token, Arc::clone(&backend));
    controller.process_pending();

    // Then: Session mirrors the snapshot
    assert!(controller.is_connected());
    assert_eq!(controller.snapshot().state(), RecorderState::Recording);
    assert_eq!(controller.snapshot().elapsed(), Some(Duration::ZERO));
    assert_eq!(backend.start_capturing_calls(), 1);
}

/// WHAT: Backend handle is not available before the connect event
/// WHY: Connection establishment is asynchronous
#[test]
#[allow(clippy::unwrap_used)]
fn given_start_when_connection_not_yet_delivered_then_controller_pending() {
    // Given: A host that has not answered yet
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());

    // When: Starting
    let token = controller.start().unwrap();

    // Then: Launch and connect were requested but nothing is attached
    assert_eq!(host.launches(), 1);
    assert_eq!(host.last_request().unwrap().mode, ConnectMode::AutoCreate);
    assert_eq!(controller.connection_token(), Some(token));
    assert!(!controller.is_connected());
    assert_eq!(controller.snapshot().state(), RecorderState::Idle);
}

/// WHAT: Starting twice leaves exactly one live connection
/// WHY: Stale sessions must not leak bindings or duplicate callbacks
#[test]
#[allow(clippy::unwrap_used)]
fn given_started_session_when_starting_again_then_single_connection_and_listener() {
    // Given: A connected controller
    let (mut controller, host, first_backend, first_token) = connected_controller();

    // When: Starting again and both connections complete
    let second_token = controller.start().unwrap();
    let second_backend = FakeBackend::new();
    host.complete(first_token, Arc::clone(&first_backend));
    host.complete(second_token, Arc::clone(&second_backend));
    controller.process_pending();

    // Then: Only the second connection is live with one listener
    assert_ne!(first_token, second_token);
    assert_eq!(host.live_bindings(), 1);
    assert_eq!(controller.connection_token(), Some(second_token));
    assert!(!first_backend.has_listener());
    assert!(second_backend.has_listener());
    assert_eq!(second_backend.listener_installs(), 1);
    assert_eq!(first_backend.listener_installs(), 1);
}

/// WHAT: A connection completing after unbind is ignored
/// WHY: Superseded attempts must not resurrect a released session
#[test]
#[allow(clippy::unwrap_used)]
fn given_unbind_during_connect_when_connection_completes_then_ignored() {
    // Given: A connect attempt in flight
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    let token = controller.start().unwrap();

    // When: Unbinding, then the stale attempt completes
    controller.unbind();
    let backend = FakeBackend::new();
    host.complete(token, Arc::clone(&backend));
    controller.process_pending();

    // Then: Nothing is attached and the backend got no listener
    assert!(!controller.is_connected());
    assert!(!backend.has_listener());
    assert_eq!(controller.snapshot().state(), RecorderState::Idle);
}

/// WHAT: Disconnect resets the session and tolerates repeats
/// WHY: Disconnect is the recovery path for backend crashes
#[test]
fn given_connected_when_backend_disconnects_twice_then_idle_without_failure() {
    // Given: A connected, recording controller
    let (mut controller, host, backend, token) = connected_controller();
    backend.push_elapsed(Duration::from_secs(8));
    controller.process_pending();
    assert_eq!(controller.snapshot().elapsed(), Some(Duration::from_secs(8)));

    // When: The backend crashes and the host reports it twice
    host.crash(token);
    host.crash(token);
    controller.process_pending();

    // Then: Session is idle and the backend reference is cleared
    assert!(!controller.is_connected());
    assert!(!backend.has_listener());
    assert_eq!(controller.snapshot().state(), RecorderState::Idle);
    assert_eq!(controller.snapshot().elapsed(), None);
}

/// WHAT: A restarted backend reconnecting with the same token is accepted
/// WHY: The recorder may restart independently of the UI
#[test]
fn given_disconnected_backend_when_host_reconnects_then_session_resynchronized() {
    // Given: A controller whose backend crashed
    let (mut controller, host, _, token) = connected_controller();
    host.crash(token);
    controller.process_pending();

    // When: The host brings a restarted backend back
    let restarted = FakeBackend::with_snapshot(RecorderState::Paused, Duration::from_secs(12));
    host.complete(token, Arc::clone(&restarted));
    controller.process_pending();

    // Then: The session mirrors the restarted backend
    assert!(controller.is_connected());
    assert_eq!(controller.snapshot().state(), RecorderState::Paused);
    assert_eq!(controller.snapshot().elapsed(), Some(Duration::from_secs(12)));
}

/// WHAT: Events pushed through a released connection's listener are dropped
/// WHY: A backend may keep sending briefly after detach
#[test]
#[allow(clippy::unwrap_used)]
fn given_released_connection_when_old_listener_pushes_then_session_unchanged() {
    // Given: A connected controller and a copy of its listener
    let (mut controller, _, backend, _) = connected_controller();
    let stale_listener = backend.take_listener_copy().unwrap();

    // When: The controller starts over and the old listener keeps pushing
    controller.start().unwrap();
    stale_listener.state_changed(RecorderState::Paused);
    stale_listener.elapsed_changed(Duration::from_secs(30));
    controller.process_pending();

    // Then: The new, not yet connected session is untouched
    assert_eq!(controller.snapshot().state(), RecorderState::Idle);
    assert_eq!(controller.snapshot().elapsed(), None);
}

/// WHAT: Unbind never fails, even twice or with nothing bound
/// WHY: "Not bound" is expected during teardown, not exceptional
#[test]
fn given_no_binding_when_unbinding_twice_then_no_failure() {
    // Given: A controller that never bound
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());

    // When: Unbinding twice
    controller.unbind();
    controller.unbind();

    // Then: Still idle, the host was never asked
    assert_eq!(host.disconnects(), 0);
    assert_eq!(controller.snapshot().state(), RecorderState::Idle);
}

/// WHAT: Unbind twice after bind releases exactly once
/// WHY: Second unbind must be a no-op
#[test]
fn given_bound_controller_when_unbinding_twice_then_single_release() {
    // Given: A controller observing a running backend
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    let token = controller.bind();
    host.complete(token, FakeBackend::with_snapshot(RecorderState::Recording, Duration::from_secs(2)));
    controller.process_pending();

    // When: Unbinding twice
    controller.unbind();
    controller.unbind();

    // Then: One release, nothing live
    assert_eq!(host.disconnects(), 1);
    assert_eq!(host.live_bindings(), 0);
    assert!(!controller.is_connected());
}

/// WHAT: Bind attaches without launching the backend
/// WHY: Observing a running recorder must not start a new one
#[test]
#[allow(clippy::unwrap_used)]
fn given_running_backend_when_binding_then_observed_without_launch() {
    // Given: A backend already recording for a minute
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    let backend = FakeBackend::with_snapshot(RecorderState::Recording, Duration::from_secs(60));

    // When: Binding
    let token = controller.bind();
    host.complete(token, Arc::clone(&backend));
    controller.process_pending();

    // Then: Attached with existing-only mode and no launch
    assert_eq!(host.launches(), 0);
    assert_eq!(host.last_request().unwrap().mode, ConnectMode::ExistingOnly);
    assert_eq!(controller.snapshot().elapsed(), Some(Duration::from_secs(60)));
    assert!(controller.snapshot().is_recording());
}

/// WHAT: Capacity set while detached is forwarded on connect
/// WHY: Configuration before start must reach the backend
#[test]
#[allow(clippy::unwrap_used)]
fn given_capacity_staged_when_connecting_then_forwarded_to_backend() {
    // Given: A detached controller with a new capacity
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    controller.set_amplitude_capacity(16).unwrap();

    // When: Starting and connecting
    let token = controller.start().unwrap();
    let backend = FakeBackend::new();
    host.complete(token, Arc::clone(&backend));
    controller.process_pending();

    // Then: The backend received the staged capacity
    assert_eq!(backend.amplitude_capacity(), Some(16));
    assert_eq!(controller.snapshot().amplitude_history().capacity(), 16);
}

/// WHAT: The backend's configured ceiling replaces the local one
/// WHY: Progress must reflect what the backend will actually enforce
#[test]
#[allow(clippy::unwrap_used)]
fn given_backend_max_duration_when_connecting_then_progress_uses_it() {
    // Given: A backend limited to 20 seconds, 5 seconds in
    let host = FakeHost::new();
    let mut controller = SessionController::new(host.clone(), test_config());
    let backend = FakeBackend::with_snapshot(RecorderState::Recording, Duration::from_secs(5));
    backend.set_max_duration(Duration::from_secs(20));

    // When: Connecting
    let token = controller.start().unwrap();
    host.complete(token, backend);
    controller.process_pending();

    // Then: Progress is a quarter
    assert_eq!(controller.snapshot().max_duration(), Duration::from_secs(20));
    assert!((controller.snapshot().progress() - 0.25).abs() < 1e-6);
}

/// WHAT: A rejected connect request leaves the controller detached
/// WHY: Bind failures are absorbed, never surfaced
#[test]
fn given_host_rejecting_connect_when_starting_then_ok_and_detached() {
    // Given: A host refusing binds
    let host = FakeHost::new();
    host.reject_connect();
    let mut controller = SessionController::new(host.clone(), test_config());

    // When: Starting
    let result = controller.start();

    // Then: No error, no connection
    assert!(result.is_ok());
    assert_eq!(controller.connection_token(), None);
    assert!(!controller.is_connected());
}

/// WHAT: Pushed updates reach subscribers as snapshots
/// WHY: Presenters re-render from published snapshots only
#[test]
#[allow(clippy::unwrap_used)]
fn given_subscriber_when_backend_pushes_elapsed_then_snapshot_published() {
    // Given: A connected controller and a subscriber that saw the latest value
    let (mut controller, _, backend, _) = connected_controller();
    let mut snapshots = controller.subscribe();
    snapshots.borrow_and_update();

    // When: The backend pushes a new elapsed time
    backend.push_elapsed(Duration::from_secs(3));
    controller.process_pending();

    // Then: The subscriber sees the change
    assert!(snapshots.has_changed().unwrap());
    assert_eq!(
        snapshots.borrow_and_update().elapsed(),
        Some(Duration::from_secs(3))
    );
}

/// WHAT: Consecutive amplitude sequences are coalesced
/// WHY: Slow consumers only need the latest sequence
#[test]
fn given_queued_amplitude_sequences_when_processing_then_only_latest_applied() {
    // Given: A connected controller counting amplitude notifications
    let (mut controller, _, backend, _) = connected_controller();
    let notified = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notified);
    controller.on_amplitudes(move |history| {
        sink.lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(history.to_vec());
    });

    // When: Three sequences queue up before processing
    backend.push_amplitudes(vec![1]);
    backend.push_amplitudes(vec![1, 2]);
    backend.push_amplitudes(vec![1, 2, 3, 4]);
    controller.process_pending();

    // Then: One notification with the latest tail
    let notified = notified.lock().unwrap_or_else(|e| e.into_inner());
    assert_eq!(*notified, vec![vec![2, 3, 4]]);
    assert_eq!(controller.snapshot().amplitude_history().to_vec(), vec![2, 3, 4]);
}

/// WHAT: Single samples are never coalesced and respect capacity
/// WHY: Every sample is part of the FIFO window
#[test]
fn given_connected_when_backend_pushes_samples_then_fifo_window_kept() {
    // Given: A connected controller with capacity three
    let (mut controller, _, backend, _) = connected_controller();

    // When: Four samples arrive
    for sample in [1, 2, 3, 4] {
        backend.push_sample(sample);
    }
    controller.process_pending();

    // Then: The oldest was evicted
    assert_eq!(controller.snapshot().amplitude_history().to_vec(), vec![2, 3, 4]);
}

/// WHAT: Dropping the controller releases its binding
/// WHY: A destroyed view-model must not leak the backend binding
#[test]
fn given_connected_controller_when_dropped_then_binding_released() {
    // Given: A connected controller
    let (controller, host, backend, _) = connected_controller();
    assert_eq!(host.live_bindings(), 1);

    // When: Dropping it
    drop(controller);

    // Then: Nothing is bound anymore
    assert_eq!(host.live_bindings(), 0);
    assert!(!backend.has_listener());
}
