//! Runner that owns its frame loop

use super::{AbstractRunner, RunnerCore};
use crate::error::Result;
use crate::state::RunnerState;
use glint_platform::{ContextAttributes, ControlFlow};
use tracing::{error, info, warn};

/// Blocks the calling thread in [`run`](AbstractRunner::run) until exit
pub struct BlockingRunner {
    core: RunnerCore,
}

impl BlockingRunner {
    pub fn new(core: RunnerCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &RunnerCore {
        &self.core
    }
}

impl AbstractRunner for BlockingRunner {
    fn setup(&mut self) -> Result<()> {
        self.core.setup()
    }

    fn render_frame(&mut self) -> Result<ControlFlow> {
        self.core.render_frame()
    }

    fn run(&mut self) -> Result<()> {
        if self.core.state() == RunnerState::Uninitialized {
            self.core.setup()?;
        }
        info!("Entering blocking frame loop");
        loop {
            match self.core.render_frame() {
                Ok(ControlFlow::Continue) => {}
                Ok(ControlFlow::Exit) => break,
                Err(e) => {
                    error!("Frame {} failed: {}", self.core.frame_index(), e);
                    if let Err(teardown) = self.core.teardown() {
                        warn!("Teardown after failure also failed: {}", teardown);
                    }
                    return Err(e);
                }
            }
        }
        self.core.teardown()
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        self.core.select_graphics_version()
    }

    fn shading_language_version(&self) -> &'static str {
        self.core.shading_language_version()
    }

    fn init_loader(&mut self) -> Result<()> {
        self.core.init_loader()
    }

    fn teardown(&mut self) -> Result<()> {
        self.core.teardown()
    }

    fn state(&self) -> RunnerState {
        self.core.state()
    }
}
