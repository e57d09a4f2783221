//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Failed to initialize the host
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Failed to create or drive the host event loop
    #[error("Event loop error: {0}")]
    EventLoop(String),

    /// Failed to create the window or canvas
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Failed to create the graphics context or surface
    #[error("Failed to create graphics context: {0}")]
    ContextCreation(String),

    /// Failed to initialize the graphics function loader
    #[error("Graphics loader initialization failed: {0}")]
    Loader(String),

    /// Failed to present a frame
    #[error("Failed to present frame: {0}")]
    Present(String),

    /// Host scheduler refused a registration
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Operation called before the surface exists
    #[error("Surface not created")]
    NoSurface,

    /// Platform not supported on this target
    #[error("Platform not supported: {0}")]
    Unsupported(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
