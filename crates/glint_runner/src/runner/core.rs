//! Backend-independent runner lifecycle shared by both variants

use crate::config::{ExitSignal, FrameCallback, RunConfiguration, TestRegistrationCallback};
use crate::context::FrameContext;
use crate::error::{Result, RunnerError};
use crate::state::RunnerState;
use crate::ui::Ui;
use glint_platform::{
    Backend, Cadence, ContextAttributes, ControlFlow, Event, SwapInterval, WindowConfig,
    WindowEvent,
};
use glint_test_engine::{TestEngine, TestEngineConfig, TestReport};
use glint_theme::Style;
use tracing::{debug, error, info, warn};

/// Setup, per-frame work and teardown over a boxed [`Backend`]
pub struct RunnerCore {
    backend: Box<dyn Backend>,
    frame_callback: FrameCallback,
    test_registration: Option<TestRegistrationCallback>,
    enable_test_engine: bool,
    engine_config: TestEngineConfig,
    window: WindowConfig,
    swap_interval: SwapInterval,
    exit: ExitSignal,
    max_frames: Option<u64>,
    cadence: Cadence,
    state: RunnerState,
    attributes: Option<ContextAttributes>,
    ui: Ui,
    style: Style,
    engine: Option<TestEngine>,
    events: Vec<Event>,
    frame_index: u64,
}

impl RunnerCore {
    pub fn new(config: RunConfiguration, backend: Box<dyn Backend>) -> Self {
        let cadence = config.cadence();
        Self {
            backend,
            frame_callback: config.frame_callback,
            test_registration: config.test_registration,
            enable_test_engine: config.enable_test_engine,
            engine_config: config.test_engine,
            window: config.window,
            swap_interval: config.swap_interval,
            exit: config.exit,
            max_frames: config.max_frames,
            cadence,
            state: RunnerState::Uninitialized,
            attributes: None,
            ui: Ui::new(),
            style: config.theme.style(),
            engine: None,
            events: Vec::new(),
            frame_index: 0,
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Bring the backend up and register tests; the backend is destroyed if
    /// any stage fails
    pub fn setup(&mut self) -> Result<()> {
        self.state.transition(RunnerState::SettingUp)?;
        match self.setup_stages() {
            Ok(()) => self.state.transition(RunnerState::Running),
            Err(e) => {
                error!("Runner setup failed: {}", e);
                self.backend.destroy();
                Err(e)
            }
        }
    }

    fn setup_stages(&mut self) -> Result<()> {
        let attributes = self.select_graphics_version();
        info!(
            "Backend '{}' selected {} (shading language '{}')",
            self.backend.name(),
            attributes.version,
            self.shading_language_version()
        );

        self.backend
            .create_surface(&self.window, &attributes)
            .map_err(|e| RunnerError::Setup {
                stage: "surface creation",
                reason: e.to_string(),
            })?;
        self.attributes = Some(attributes);
        self.init_loader()?;
        self.backend.set_swap_interval(self.swap_interval);

        if self.enable_test_engine && !self.backend.supports_test_engine() {
            warn!(
                "Backend '{}' cannot host the test engine; running without it",
                self.backend.name()
            );
            self.enable_test_engine = false;
        }
        if self.enable_test_engine {
            let mut engine =
                TestEngine::new(self.engine_config.clone()).map_err(|e| RunnerError::Setup {
                    stage: "test engine",
                    reason: e.to_string(),
                })?;
            if let Some(register) = self.test_registration.take() {
                register(&mut engine).map_err(|e| RunnerError::Setup {
                    stage: "test registration",
                    reason: e.to_string(),
                })?;
            }
            engine.seal_registration();
            info!(
                "Test engine ready with {} test(s)",
                engine.registered_tests().count()
            );
            self.engine = Some(engine);
        }
        Ok(())
    }

    pub fn select_graphics_version(&mut self) -> ContextAttributes {
        self.backend.select_graphics_version()
    }

    pub fn shading_language_version(&self) -> &'static str {
        self.backend.shading_language_version()
    }

    pub fn init_loader(&mut self) -> Result<()> {
        self.backend.init_loader().map_err(|e| RunnerError::Setup {
            stage: "loader",
            reason: e.to_string(),
        })
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// One loop iteration
    pub fn render_frame(&mut self) -> Result<ControlFlow> {
        match self.state {
            RunnerState::Running => {}
            RunnerState::ExitRequested | RunnerState::TornDown => return Ok(ControlFlow::Exit),
            other => return Err(RunnerError::NotRunning(other)),
        }

        self.events.clear();
        self.backend.poll_events(&mut self.events);
        if self
            .events
            .iter()
            .any(|event| matches!(event, Event::Window(WindowEvent::CloseRequested)))
        {
            debug!("Host requested window close");
            self.exit.request();
        }
        self.check_frame_limit();
        if self.exit.is_requested() {
            self.request_exit();
            return Ok(ControlFlow::Exit);
        }

        self.frame_index += 1;
        let surface = self.backend.surface_size();
        self.ui.begin_frame(&self.events, surface, &self.style);
        {
            let mut cx = FrameContext::new(
                &mut self.ui,
                self.engine.as_mut(),
                &self.exit,
                &self.style,
                self.frame_index,
            );
            (self.frame_callback)(&mut cx);
        }
        self.ui.end_frame();

        if let Some(engine) = self.engine.as_mut() {
            engine.on_frame_rendered(&mut self.ui);
        }
        self.backend.present(self.ui.draw_list())?;

        self.check_frame_limit();
        if self.exit.is_requested() {
            self.request_exit();
            return Ok(ControlFlow::Exit);
        }
        Ok(ControlFlow::Continue)
    }

    /// Request exit once `max_frames` have rendered; a limit of zero renders
    /// nothing
    fn check_frame_limit(&mut self) {
        if let Some(max) = self.max_frames {
            if self.frame_index >= max && !self.exit.is_requested() {
                warn!("Reached the {} frame limit; requesting exit", max);
                self.exit.request();
            }
        }
    }

    fn request_exit(&mut self) {
        if self.state.transition(RunnerState::ExitRequested).is_err() {
            return;
        }
        info!("Exit requested after {} frame(s)", self.frame_index);
        self.abandon_tests();
    }

    fn abandon_tests(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if !engine.is_idle() {
                engine.abandon();
            }
            info!("{}", engine.report());
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release the backend; repeated calls are no-ops
    pub fn teardown(&mut self) -> Result<()> {
        match self.state {
            RunnerState::TornDown => return Ok(()),
            RunnerState::Running => self.abandon_tests(),
            RunnerState::ExitRequested => {}
            from => {
                return Err(RunnerError::InvalidTransition {
                    from,
                    to: RunnerState::TornDown,
                })
            }
        }
        self.backend.destroy();
        self.state.transition(RunnerState::TornDown)?;
        info!("Runner torn down");
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn attributes(&self) -> Option<&ContextAttributes> {
        self.attributes.as_ref()
    }

    pub fn test_engine(&self) -> Option<&TestEngine> {
        self.engine.as_ref()
    }

    pub fn test_report(&self) -> Option<TestReport> {
        self.engine.as_ref().map(|engine| engine.report().clone())
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn exit_signal(&self) -> &ExitSignal {
        &self.exit
    }
}
