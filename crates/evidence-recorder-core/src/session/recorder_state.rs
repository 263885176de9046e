use std::fmt;

/// Capture state reported by the recorder backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// Nothing is being captured and no backend is attached.
    #[default]
    Idle,
    /// Audio is being captured.
    Recording,
    /// Capture is suspended but the session is still open.
    Paused,
    /// The backend halted capture because of an internal fault.
    StoppedError,
}

impl RecorderState {
    /// Short lowercase label for logs and status lines.
    pub fn label(self) -> &'static str {
        match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::StoppedError => "stopped (error)",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
