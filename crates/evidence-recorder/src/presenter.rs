//! Terminal rendering of recording snapshots.
//!
//! The presenter only reads published [`RecordingSession`] snapshots and
//! turns them into single status lines. It never mutates session state.

use std::time::Duration;

use evidence_recorder_core::{
    Amplitude, AmplitudeHistory, ArtifactRef, CaptureFailure, RecordingSession,
};

/// Width of the progress bar in cells.
const PROGRESS_WIDTH: usize = 20;

/// Sparkline glyphs from quietest to loudest.
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Loudest amplitude a recorder reports.
const MAX_AMPLITUDE: Amplitude = 32_767;

/// Renders snapshots, suppressing lines identical to the previous one.
#[derive(Debug, Default)]
pub struct Presenter {
    last_line: Option<String>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status line for `session`, or `None` when nothing visible changed.
    pub fn render(&mut self, session: &RecordingSession) -> Option<String> {
        let line = status_line(session);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last_line = Some(line.clone());
        Some(line)
    }
}

/// Full status line: state, elapsed, progress and sparkline.
pub fn status_line(session: &RecordingSession) -> String {
    let state = session.state().label();
    let Some(elapsed) = session.elapsed() else {
        return format!("[{:<9}] --:--", state);
    };

    format!(
        "[{:<9}] {} / {} {} {:>3}% {}",
        state,
        format_duration(elapsed),
        format_duration(session.max_duration()),
        progress_bar(session.progress()),
        (session.progress() * 100.0).round() as u32,
        sparkline(session.amplitude_history()),
    )
}

/// `MM:SS`, or `H:MM:SS` from one hour on.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

pub fn progress_bar(progress: f32) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * PROGRESS_WIDTH as f32).round() as usize)
        .min(PROGRESS_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

/// One glyph per retained sample, oldest first.
pub fn sparkline(history: &AmplitudeHistory) -> String {
    history.iter().map(spark_glyph).collect()
}

fn spark_glyph(sample: Amplitude) -> char {
    let clamped = sample.clamp(0, MAX_AMPLITUDE) as usize;
    let index = clamped * (SPARK_LEVELS.len() - 1) / MAX_AMPLITUDE as usize;
    SPARK_LEVELS[index]
}

pub fn saved_line(artifact: &ArtifactRef) -> String {
    format!(
        "Saved recording {} ({}) to {}",
        artifact.id,
        format_duration(artifact.duration),
        artifact.path.display()
    )
}

/// Explains a capture failure, including whether anything was kept.
pub fn failure_line(failure: &CaptureFailure) -> String {
    match (&failure.artifact, &failure.finalize_error) {
        (Some(artifact), _) => format!(
            "Recording failed: {}. Partial recording saved to {}",
            failure.error,
            artifact.path.display()
        ),
        (None, Some(finalize_error)) => format!(
            "Recording failed: {}. Could not save it: {}",
            failure.error, finalize_error
        ),
        (None, None) => format!("Recording failed: {}", failure.error),
    }
}
