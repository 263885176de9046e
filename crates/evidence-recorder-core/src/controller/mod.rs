mod config;
mod hooks;
mod link;
mod session_controller;

pub use {
    config::{DEFAULT_MAX_DURATION, SessionConfig},
    hooks::CaptureFailure,
    session_controller::SessionController,
};

pub(crate) use link::{ConnectIntent, Link};
