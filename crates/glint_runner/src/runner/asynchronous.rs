//! Runner for hosts that own the frame loop (browsers)
//!
//! `run` performs setup, hands a per-frame step to the host scheduler and
//! returns at once. The step renders one frame per invocation; on exit it
//! tears the runner down and returns [`ControlFlow::Exit`], which makes the
//! scheduler drop the registration.

use super::{AbstractRunner, RunnerCore};
use crate::error::{Result, RunnerError};
use crate::state::RunnerState;
use glint_platform::{ContextAttributes, ControlFlow, HostScheduler};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use tracing::{error, info, warn};

/// Never blocks; frames are driven by a [`HostScheduler`]
pub struct AsyncRunner {
    core: Rc<RefCell<RunnerCore>>,
    scheduler: Box<dyn HostScheduler>,
}

impl AsyncRunner {
    pub fn new(core: RunnerCore, scheduler: Box<dyn HostScheduler>) -> Self {
        Self {
            core: Rc::new(RefCell::new(core)),
            scheduler,
        }
    }

    /// Shared handle to the runner core, also held by the scheduled step
    pub fn core(&self) -> Rc<RefCell<RunnerCore>> {
        Rc::clone(&self.core)
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_registered()
    }

    fn borrow_core(&self) -> Result<RefMut<'_, RunnerCore>> {
        self.core.try_borrow_mut().map_err(|_| RunnerError::Reentrant)
    }
}

/// One scheduled invocation
fn step(core: &RefCell<RunnerCore>) -> ControlFlow {
    let Ok(mut core) = core.try_borrow_mut() else {
        warn!("Host invoked the frame step re-entrantly; skipping");
        return ControlFlow::Continue;
    };
    let flow = match core.render_frame() {
        Ok(flow) => flow,
        Err(e) => {
            error!("Frame {} failed: {}", core.frame_index(), e);
            ControlFlow::Exit
        }
    };
    if flow.is_exit() {
        if let Err(e) = core.teardown() {
            error!("Teardown failed: {}", e);
        }
    }
    flow
}

impl AbstractRunner for AsyncRunner {
    fn setup(&mut self) -> Result<()> {
        self.borrow_core()?.setup()
    }

    fn render_frame(&mut self) -> Result<ControlFlow> {
        self.borrow_core()?.render_frame()
    }

    fn run(&mut self) -> Result<()> {
        let cadence = {
            let mut core = self.borrow_core()?;
            if core.state() == RunnerState::Uninitialized {
                core.setup()?;
            }
            core.cadence()
        };
        let core = Rc::clone(&self.core);
        self.scheduler
            .register_repeating_callback(cadence, Box::new(move || step(&core)))?;
        info!("Frame step handed to the host scheduler ({:?})", cadence);
        Ok(())
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        self.core.borrow_mut().select_graphics_version()
    }

    fn shading_language_version(&self) -> &'static str {
        self.core.borrow().shading_language_version()
    }

    fn init_loader(&mut self) -> Result<()> {
        self.borrow_core()?.init_loader()
    }

    fn teardown(&mut self) -> Result<()> {
        if self.scheduler.is_registered() {
            self.scheduler.cancel_repeating_callback();
        }
        self.borrow_core()?.teardown()
    }

    fn state(&self) -> RunnerState {
        self.core.borrow().state()
    }
}
