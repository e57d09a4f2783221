//! Runner error types

use crate::state::RunnerState;
use glint_platform::PlatformError;
use std::path::PathBuf;
use thiserror::Error;

/// Runner errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A setup stage failed; startup is aborted
    #[error("Setup failed during {stage}: {reason}")]
    Setup { stage: &'static str, reason: String },

    /// Attempt to move the runner state backwards
    #[error("Runner state cannot go back from {from:?} to {to:?}")]
    StateRegression { from: RunnerState, to: RunnerState },

    /// Forward transition that skips a required state
    #[error("Runner state cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: RunnerState, to: RunnerState },

    /// Frame rendered outside the running state
    #[error("Runner is not running (state {0:?})")]
    NotRunning(RunnerState),

    /// A host called back into the runner while a frame was in progress
    #[error("render_frame re-entered while a frame is in progress")]
    Reentrant,

    /// Backend failure while rendering
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Settings file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be parsed
    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Result type for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;
