//! Test engine error types

use crate::registry::TestId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned to the caller of the engine API
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestEngineError {
    /// A test with this (category, name) is already registered
    #[error("Test already registered: {0}")]
    DuplicateTest(TestId),

    /// No registered test carries this id
    #[error("Unknown test: {0}")]
    UnknownTest(TestId),

    /// Registration was sealed once setup finished
    #[error("Test registration is closed: {0}")]
    RegistrationClosed(TestId),

    /// Configuration that can never work
    #[error("Invalid test engine configuration: {0}")]
    InvalidConfig(String),
}

/// Why a scripted step failed; local to one test
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// No submitted item matched the path before the step timed out
    #[error("No item matches '{pattern}'")]
    ItemNotFound { pattern: String },

    /// The step waited too long for its condition
    #[error("Step timed out after {frames} frames: {reason}")]
    Timeout { frames: u32, reason: String },

    /// The item exists but cannot take this action
    #[error("Item '{path}' cannot be {action}")]
    InvalidItem { path: String, action: &'static str },

    /// A malformed item path
    #[error("Invalid item path '{0}'")]
    InvalidPath(String),

    /// Screenshot capture failed
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Screenshot capture errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// The window rect is empty or entirely off-surface
    #[error("Nothing to capture for window '{0}'")]
    EmptyRegion(String),

    /// Pixel data did not match the declared size
    #[error("Framebuffer of {width}x{height} has the wrong length")]
    InvalidBuffer { width: u32, height: u32 },

    /// Writing the image failed
    #[error("Failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, TestEngineError>;
