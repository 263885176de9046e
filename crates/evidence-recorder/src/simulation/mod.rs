//! In-process stand-ins for the recorder service and its binding layer.
//!
//! They let the controller run end to end in a terminal without a platform
//! service: elapsed time and amplitudes are synthesized on a tokio task, and
//! finalizing writes a small TOML descriptor of the artifact.

mod backend;
mod host;
mod settings;

pub(crate) use {backend::SimulatedBackend, host::LocalHost, settings::SimulationSettings};

#[cfg(test)]
pub(crate) use backend::synthesize_amplitude;
