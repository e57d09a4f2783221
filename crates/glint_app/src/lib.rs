//! Glint Application Framework
//!
//! Entry point for applications: build a [`RunConfiguration`], then call
//! [`run`] to start it on whatever host the build targets.
//!
//! # Example
//!
//! ```ignore
//! use glint_app::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = RunConfiguration::new(|cx| {
//!         cx.ui().window("Main", |ui| ui.text("Hello"));
//!     });
//!     glint_app::run(config)?;
//!     Ok(())
//! }
//! ```

pub mod demo;
mod host;

pub use host::{default_backend, run, run_with_backend};

pub use glint_platform::{Backend, WindowConfig};
pub use glint_runner::{
    AbstractRunner, AppRunner, FrameContext, HeadlessBackend, Result, RunConfiguration,
    RunnerError, RunnerSettings, RunnerState, Ui,
};
pub use glint_test_engine::{TestEngine, TestReport};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::host::{run, run_with_backend};
    pub use glint_runner::prelude::*;
}
