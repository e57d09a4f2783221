//! Runner lifecycle and its two host variants
//!
//! [`AppRunner`] is the closed set of runners. It is chosen once, when it is
//! built, from what the backend reports: a backend that hands out a
//! [`HostScheduler`](glint_platform::HostScheduler) lives on an asynchronous
//! host and gets an [`AsyncRunner`]; everything else gets a
//! [`BlockingRunner`].

mod asynchronous;
mod blocking;
mod core;

pub use self::asynchronous::AsyncRunner;
pub use self::blocking::BlockingRunner;
pub use self::core::RunnerCore;

use crate::config::RunConfiguration;
use crate::error::Result;
use crate::state::RunnerState;
use glint_platform::{Backend, ContextAttributes, ControlFlow};
use glint_test_engine::TestReport;

/// Lifecycle contract shared by every runner variant
pub trait AbstractRunner {
    /// Select the context, create the surface, init the loader, then create
    /// the test engine and register tests. Failure is fatal.
    fn setup(&mut self) -> Result<()>;

    /// One frame: events, exit check, UI, test engine, present
    fn render_frame(&mut self) -> Result<ControlFlow>;

    /// Blocking variants return after teardown; asynchronous variants return
    /// as soon as the frame step is registered with the host
    fn run(&mut self) -> Result<()>;

    fn select_graphics_version(&mut self) -> ContextAttributes;

    fn shading_language_version(&self) -> &'static str;

    fn init_loader(&mut self) -> Result<()>;

    fn teardown(&mut self) -> Result<()>;

    fn state(&self) -> RunnerState;
}

/// The runner for a given backend
pub enum AppRunner {
    Blocking(BlockingRunner),
    Async(AsyncRunner),
}

impl AppRunner {
    pub fn new(config: RunConfiguration, mut backend: Box<dyn Backend>) -> Self {
        let scheduler = backend.scheduler();
        let name = backend.name();
        let core = RunnerCore::new(config, backend);
        match scheduler {
            Some(scheduler) => {
                tracing::debug!("Backend '{}' schedules frames; using async runner", name);
                AppRunner::Async(AsyncRunner::new(core, scheduler))
            }
            None => {
                tracing::debug!("Backend '{}' runs its own loop; using blocking runner", name);
                AppRunner::Blocking(BlockingRunner::new(core))
            }
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, AppRunner::Async(_))
    }

    /// Snapshot of the test engine's results, if the engine is active
    pub fn test_report(&self) -> Option<TestReport> {
        match self {
            AppRunner::Blocking(runner) => runner.core().test_report(),
            AppRunner::Async(runner) => runner.core().borrow().test_report(),
        }
    }

    pub fn frame_index(&self) -> u64 {
        match self {
            AppRunner::Blocking(runner) => runner.core().frame_index(),
            AppRunner::Async(runner) => runner.core().borrow().frame_index(),
        }
    }

    fn inner(&mut self) -> &mut dyn AbstractRunner {
        match self {
            AppRunner::Blocking(runner) => runner,
            AppRunner::Async(runner) => runner,
        }
    }

    fn inner_ref(&self) -> &dyn AbstractRunner {
        match self {
            AppRunner::Blocking(runner) => runner,
            AppRunner::Async(runner) => runner,
        }
    }
}

impl AbstractRunner for AppRunner {
    fn setup(&mut self) -> Result<()> {
        self.inner().setup()
    }

    fn render_frame(&mut self) -> Result<ControlFlow> {
        self.inner().render_frame()
    }

    fn run(&mut self) -> Result<()> {
        self.inner().run()
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        self.inner().select_graphics_version()
    }

    fn shading_language_version(&self) -> &'static str {
        self.inner_ref().shading_language_version()
    }

    fn init_loader(&mut self) -> Result<()> {
        self.inner().init_loader()
    }

    fn teardown(&mut self) -> Result<()> {
        self.inner().teardown()
    }

    fn state(&self) -> RunnerState {
        self.inner_ref().state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunnerError;
    use crate::headless::HeadlessBackend;
    use crate::scheduler::ManualScheduler;
    use glint_platform::{Cadence, Event, HostScheduler, WindowEvent};
    use glint_test_engine::{Step, TestEngineConfig, TestEngineError, TestId, TestStatus};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_config(frames: Rc<Cell<u64>>) -> RunConfiguration {
        RunConfiguration::new(move |cx| {
            frames.set(frames.get() + 1);
            cx.ui().window("Main", |ui| ui.text("Hello"));
        })
    }

    #[test]
    fn test_variant_is_chosen_by_backend() {
        let blocking = AppRunner::new(
            RunConfiguration::new(|_| {}),
            Box::new(HeadlessBackend::new(320, 240)),
        );
        assert!(!blocking.is_async());

        let asynchronous = AppRunner::new(
            RunConfiguration::new(|_| {}),
            Box::new(HeadlessBackend::new(320, 240).with_scheduler(ManualScheduler::new())),
        );
        assert!(asynchronous.is_async());
    }

    #[test]
    fn test_blocking_run_until_exit_signal() {
        let frames = Rc::new(Cell::new(0));
        let counted = Rc::clone(&frames);
        let config = RunConfiguration::new(move |cx| {
            counted.set(counted.get() + 1);
            if cx.frame_index() == 5 {
                cx.request_exit();
            }
        });
        let backend = HeadlessBackend::new(320, 240);
        let probe = backend.probe();
        let mut runner = AppRunner::new(config, Box::new(backend));

        runner.run().unwrap();
        assert_eq!(frames.get(), 5);
        assert_eq!(runner.state(), RunnerState::TornDown);
        assert_eq!(probe.presented(), 5);
        assert!(probe.destroyed());
    }

    #[test]
    fn test_close_request_stops_before_callback() {
        let frames = Rc::new(Cell::new(0));
        let backend = HeadlessBackend::new(320, 240)
            .with_event(3, Event::Window(WindowEvent::CloseRequested));
        let mut runner = AppRunner::new(counting_config(Rc::clone(&frames)), Box::new(backend));

        runner.run().unwrap();
        assert_eq!(frames.get(), 2);
        assert_eq!(runner.frame_index(), 2);
    }

    #[test]
    fn test_max_frames_caps_the_loop() {
        let frames = Rc::new(Cell::new(0));
        let config = counting_config(Rc::clone(&frames)).max_frames(7);
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(320, 240)));
        runner.run().unwrap();
        assert_eq!(frames.get(), 7);
    }

    #[test]
    fn test_zero_max_frames_renders_nothing() {
        let frames = Rc::new(Cell::new(0));
        let config = counting_config(Rc::clone(&frames)).max_frames(0);
        let backend = HeadlessBackend::new(320, 240);
        let probe = backend.probe();
        let mut runner = AppRunner::new(config, Box::new(backend));
        runner.run().unwrap();
        assert_eq!(frames.get(), 0);
        assert_eq!(runner.frame_index(), 0);
        assert_eq!(probe.presented(), 0);
        assert_eq!(runner.state(), RunnerState::TornDown);
    }

    #[test]
    fn test_state_never_regresses_across_frames() {
        let config = RunConfiguration::new(|cx| {
            if cx.frame_index() == 3 {
                cx.request_exit();
            }
        });
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(64, 64)));
        assert!(matches!(
            runner.render_frame(),
            Err(RunnerError::NotRunning(RunnerState::Uninitialized))
        ));

        runner.setup().unwrap();
        let mut last = runner.state();
        for _ in 0..10 {
            runner.render_frame().unwrap();
            assert!(runner.state() >= last);
            last = runner.state();
        }
        assert_eq!(runner.state(), RunnerState::ExitRequested);
        assert_eq!(runner.render_frame().unwrap(), ControlFlow::Exit);

        runner.teardown().unwrap();
        runner.teardown().unwrap();
        assert!(matches!(runner.setup(), Err(RunnerError::StateRegression { .. })));
        assert_eq!(runner.state(), RunnerState::TornDown);
    }

    #[test]
    fn test_setup_failure_is_fatal() {
        let backend = HeadlessBackend::new(64, 64).failing_surface();
        let probe = backend.probe();
        let mut runner = AppRunner::new(RunConfiguration::new(|_| {}), Box::new(backend));

        let err = runner.run().unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Setup {
                stage: "surface creation",
                ..
            }
        ));
        assert!(probe.destroyed());
        assert_eq!(runner.state(), RunnerState::SettingUp);
    }

    #[test]
    fn test_registration_errors_abort_setup() {
        let config = RunConfiguration::new(|_| {}).with_tests(|engine| {
            engine.register_test("a", "dup", vec![])?;
            engine.register_test("a", "dup", vec![])?;
            Ok(())
        });
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(64, 64)));
        assert!(matches!(
            runner.setup(),
            Err(RunnerError::Setup {
                stage: "test registration",
                ..
            })
        ));
    }

    #[test]
    fn test_registration_closes_after_setup() {
        let late = Rc::new(Cell::new(None));
        let seen = Rc::clone(&late);
        let config = RunConfiguration::new(move |cx| {
            if cx.frame_index() == 5 {
                if let Some(engine) = cx.test_engine_mut() {
                    seen.set(Some(engine.register_test("late", "added", vec![])));
                }
                cx.request_exit();
            }
        })
        .test_engine_config(TestEngineConfig::default().threshold(3))
        .with_tests(|engine| engine.register_test("early", "added", vec![]).map(|_| ()));
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(64, 64)));
        runner.run().unwrap();

        assert_eq!(
            late.take(),
            Some(Err(TestEngineError::RegistrationClosed(TestId::new(
                "late", "added"
            ))))
        );
        let report = runner.test_report().unwrap();
        assert_eq!(report.results().len(), 1);
        assert!(report.all_passed());
    }

    #[test]
    fn test_engine_disabled_on_unsupported_backend() {
        let config = RunConfiguration::new(|cx| assert!(cx.test_engine().is_none()))
            .with_tests(|engine| engine.register_test("a", "b", vec![]).map(|_| ()))
            .max_frames(2);
        let backend = HeadlessBackend::new(64, 64).without_test_engine();
        let mut runner = AppRunner::new(config, Box::new(backend));
        runner.run().unwrap();
        assert!(runner.test_report().is_none());
    }

    #[test]
    fn test_exit_abandons_in_flight_tests() {
        let config = RunConfiguration::new(|cx| {
            if cx.frame_index() == 4 {
                cx.request_exit();
            }
        })
        .test_engine_config(TestEngineConfig::default().threshold(3).step_timeout(None))
        .with_tests(|engine| {
            engine.register_test("slow", "waits", vec![Step::Yield(100)])?;
            engine.register_test("slow", "never_starts", vec![])?;
            Ok(())
        });
        let mut runner = AppRunner::new(config, Box::new(HeadlessBackend::new(64, 64)));
        runner.run().unwrap();

        let report = runner.test_report().unwrap();
        assert_eq!(report.abandoned(), 2);
        assert_eq!(
            report.get(&TestId::new("slow", "waits")).map(|r| r.status),
            Some(TestStatus::Abandoned)
        );
    }

    #[test]
    fn test_async_run_returns_and_host_drives_frames() {
        let frames = Rc::new(Cell::new(0));
        let counted = Rc::clone(&frames);
        let config = RunConfiguration::new(move |cx| {
            counted.set(counted.get() + 1);
            if cx.frame_index() == 3 {
                cx.request_exit();
            }
        })
        .target_callback_cadence(60);
        let scheduler = ManualScheduler::new();
        let backend = HeadlessBackend::new(64, 64).with_scheduler(scheduler.clone());
        let probe = backend.probe();
        let mut runner = AppRunner::new(config, Box::new(backend));

        runner.run().unwrap();
        assert_eq!(frames.get(), 0);
        assert_eq!(runner.state(), RunnerState::Running);
        assert_eq!(scheduler.cadence(), Some(Cadence::PerSecond(60)));

        assert_eq!(scheduler.fire_until_cancelled(10), 3);
        assert_eq!(frames.get(), 3);
        assert!(!scheduler.is_registered());
        assert_eq!(runner.state(), RunnerState::TornDown);
        assert!(probe.destroyed());
    }
}
