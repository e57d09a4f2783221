//! Per-frame context passed to the frame callback

use crate::config::ExitSignal;
use crate::ui::Ui;
use glint_test_engine::TestEngine;
use glint_theme::Style;

/// What the frame callback can see and do during one frame
pub struct FrameContext<'a> {
    ui: &'a mut Ui,
    engine: Option<&'a mut TestEngine>,
    exit: &'a ExitSignal,
    style: &'a Style,
    frame_index: u64,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        ui: &'a mut Ui,
        engine: Option<&'a mut TestEngine>,
        exit: &'a ExitSignal,
        style: &'a Style,
        frame_index: u64,
    ) -> Self {
        Self {
            ui,
            engine,
            exit,
            style,
            frame_index,
        }
    }

    /// Item submission surface for this frame
    pub fn ui(&mut self) -> &mut Ui {
        &mut *self.ui
    }

    pub fn style(&self) -> &Style {
        self.style
    }

    /// 1 for the first rendered frame
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Ask the runner to exit once this frame is presented
    pub fn request_exit(&self) {
        self.exit.request();
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.is_requested()
    }

    pub fn test_engine(&self) -> Option<&TestEngine> {
        self.engine.as_deref()
    }

    pub fn test_engine_mut(&mut self) -> Option<&mut TestEngine> {
        self.engine.as_deref_mut()
    }

    /// Whether the test engine is active and wants its windows drawn
    pub fn show_test_engine_windows(&self) -> bool {
        self.engine
            .as_deref()
            .is_some_and(|engine| engine.config().show_windows)
    }

    /// Draw the test engine's windows, if [`show_test_engine_windows`] says so
    ///
    /// [`show_test_engine_windows`]: FrameContext::show_test_engine_windows
    pub fn draw_test_engine_windows(&mut self) {
        if let Some(engine) = self.engine.as_deref() {
            engine.show_windows(&mut *self.ui);
        }
    }
}
