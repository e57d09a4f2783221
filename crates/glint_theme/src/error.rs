//! Theme error types

use thiserror::Error;

/// Theme-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// No built-in theme carries this name
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}
