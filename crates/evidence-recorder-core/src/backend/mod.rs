mod connection;
mod host;
mod listener;
mod recorder_backend;

pub use {
    connection::{ConnectionEvent, ConnectionSender, ConnectionToken},
    host::{BackendHost, ConnectMode, ConnectRequest},
    listener::{BackendEvent, BackendListener},
    recorder_backend::{BackendSnapshot, RecorderBackend},
};
