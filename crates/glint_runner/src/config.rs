//! Run configuration handed to the runner factory

use crate::context::FrameContext;
use crate::settings::RunnerSettings;
use glint_platform::{Cadence, SwapInterval, WindowConfig};
use glint_test_engine::{TestEngine, TestEngineConfig, TestEngineError};
use glint_theme::TweakedTheme;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Called once per rendered frame to submit the UI
pub type FrameCallback = Box<dyn FnMut(&mut FrameContext<'_>)>;

/// Called once during setup, after the test engine is created
pub type TestRegistrationCallback =
    Box<dyn FnOnce(&mut TestEngine) -> Result<(), TestEngineError>>;

/// Shared "please exit" flag
///
/// Checked at the top of every frame and again after the frame callback.
/// Clones share the flag, so it can be handed to other threads.
#[derive(Clone, Debug, Default)]
pub struct ExitSignal(Arc<AtomicBool>);

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything the runner needs to set up and drive an application
pub struct RunConfiguration {
    pub frame_callback: FrameCallback,
    pub test_registration: Option<TestRegistrationCallback>,
    pub enable_test_engine: bool,
    pub exit: ExitSignal,
    /// Frames per second for host-scheduled runners; 0 lets the host decide
    pub target_callback_cadence: u32,
    pub window: WindowConfig,
    pub swap_interval: SwapInterval,
    pub test_engine: TestEngineConfig,
    pub theme: TweakedTheme,
    /// Request exit after this many frames
    pub max_frames: Option<u64>,
}

impl RunConfiguration {
    pub fn new(frame_callback: impl FnMut(&mut FrameContext<'_>) + 'static) -> Self {
        Self {
            frame_callback: Box::new(frame_callback),
            test_registration: None,
            enable_test_engine: false,
            exit: ExitSignal::new(),
            target_callback_cadence: 0,
            window: WindowConfig::default(),
            swap_interval: SwapInterval::default(),
            test_engine: TestEngineConfig::default(),
            theme: TweakedTheme::default(),
            max_frames: None,
        }
    }

    /// Build from parsed settings; the callbacks still come from code
    pub fn from_settings(
        settings: &RunnerSettings,
        frame_callback: impl FnMut(&mut FrameContext<'_>) + 'static,
    ) -> Self {
        Self {
            enable_test_engine: settings.test_engine.enabled,
            target_callback_cadence: settings.target_fps,
            window: settings.window.clone(),
            swap_interval: settings.swap_interval,
            test_engine: settings.test_engine.to_config(),
            theme: settings.theme,
            max_frames: settings.max_frames,
            ..Self::new(frame_callback)
        }
    }

    /// Register tests once the engine exists; also enables the engine
    pub fn with_tests(
        mut self,
        register: impl FnOnce(&mut TestEngine) -> Result<(), TestEngineError> + 'static,
    ) -> Self {
        self.test_registration = Some(Box::new(register));
        self.enable_test_engine = true;
        self
    }

    pub fn enable_test_engine(mut self, enable: bool) -> Self {
        self.enable_test_engine = enable;
        self
    }

    pub fn test_engine_config(mut self, config: TestEngineConfig) -> Self {
        self.test_engine = config;
        self
    }

    pub fn window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn swap_interval(mut self, interval: SwapInterval) -> Self {
        self.swap_interval = interval;
        self
    }

    pub fn target_callback_cadence(mut self, fps: u32) -> Self {
        self.target_callback_cadence = fps;
        self
    }

    pub fn theme(mut self, theme: TweakedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Use an existing exit flag (for example one shared with a signal handler)
    pub fn exit_signal(mut self, exit: ExitSignal) -> Self {
        self.exit = exit;
        self
    }

    pub fn cadence(&self) -> Cadence {
        Cadence::from_fps(self.target_callback_cadence)
    }
}
