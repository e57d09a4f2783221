//! Glint Runner
//!
//! Drives an immediate-mode application: one frame callback, a backend, and
//! an optional in-process test engine.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized -> SettingUp -> Running -> ExitRequested -> TornDown
//! ```
//!
//! [`AppRunner::new`] picks the variant once from the backend: a backend that
//! returns a host scheduler gets the never-blocking [`AsyncRunner`], all
//! others get the [`BlockingRunner`] that owns its loop.
//!
//! # Example
//!
//! ```
//! use glint_runner::prelude::*;
//!
//! let config = RunConfiguration::new(|cx| {
//!     cx.ui().window("Main", |ui| {
//!         ui.text("Hello");
//!     });
//!     if cx.frame_index() == 3 {
//!         cx.request_exit();
//!     }
//! });
//!
//! let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(640, 480)));
//! runner.run()?;
//! assert_eq!(runner.state(), RunnerState::TornDown);
//! # Ok::<(), glint_runner::RunnerError>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod headless;
pub mod runner;
pub mod scheduler;
pub mod settings;
pub mod state;
pub mod ui;

pub use config::{ExitSignal, FrameCallback, RunConfiguration, TestRegistrationCallback};
pub use context::FrameContext;
pub use error::{Result, RunnerError};
pub use headless::{HeadlessBackend, HeadlessProbe};
pub use runner::{AbstractRunner, AppRunner, AsyncRunner, BlockingRunner, RunnerCore};
pub use scheduler::ManualScheduler;
pub use settings::{RunnerSettings, TestEngineSettings};
pub use state::RunnerState;
pub use ui::{Ui, DEFAULT_WINDOW};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExitSignal, RunConfiguration};
    pub use crate::context::FrameContext;
    pub use crate::error::{Result, RunnerError};
    pub use crate::headless::HeadlessBackend;
    pub use crate::runner::{AbstractRunner, AppRunner};
    pub use crate::settings::RunnerSettings;
    pub use crate::state::RunnerState;
    pub use crate::ui::Ui;
    pub use glint_test_engine::{CaptureFlags, RunSpeed, Step, TestEngine, TestEngineConfig};
    pub use glint_theme::{ThemeId, ThemeTweaks, TweakedTheme};
}
