//! In-process backend with a CPU framebuffer
//!
//! Used for CI automation and tests. It has no window; events are scripted
//! up front and every presented frame is rasterized into a [`Framebuffer`]
//! that can be inspected through a [`HeadlessProbe`].

use crate::scheduler::ManualScheduler;
use glint_platform::{
    Backend, ContextAttributes, DrawList, Event, Framebuffer, GraphicsVersion, HostScheduler,
    PlatformError, RasterOptions, Result, SwapInterval, WindowConfig, WindowEvent,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct ProbeState {
    presented: u64,
    last_frame: Option<Framebuffer>,
    destroyed: bool,
    swap_interval: Option<SwapInterval>,
    attributes: Option<ContextAttributes>,
}

/// Read-only view of what a [`HeadlessBackend`] did; survives the backend
#[derive(Clone, Default)]
pub struct HeadlessProbe {
    state: Rc<RefCell<ProbeState>>,
}

impl HeadlessProbe {
    pub fn presented(&self) -> u64 {
        self.state.borrow().presented
    }

    pub fn last_frame(&self) -> Option<Framebuffer> {
        self.state.borrow().last_frame.clone()
    }

    pub fn destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    pub fn swap_interval(&self) -> Option<SwapInterval> {
        self.state.borrow().swap_interval
    }

    pub fn attributes(&self) -> Option<ContextAttributes> {
        self.state.borrow().attributes
    }
}

/// Blocking backend without a window
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    surface: bool,
    fail_surface: bool,
    test_engine: bool,
    /// `(poll number, event)`; poll numbers start at 1
    scripted: Vec<(u64, Event)>,
    polls: u64,
    scheduler: Option<ManualScheduler>,
    probe: HeadlessProbe,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            surface: false,
            fail_surface: false,
            test_engine: true,
            scripted: Vec::new(),
            polls: 0,
            scheduler: None,
            probe: HeadlessProbe::default(),
        }
    }

    /// Deliver `event` on the `frame`-th event poll
    pub fn with_event(mut self, frame: u64, event: Event) -> Self {
        self.scripted.push((frame, event));
        self
    }

    /// Make surface creation fail, for exercising setup errors
    pub fn failing_surface(mut self) -> Self {
        self.fail_surface = true;
        self
    }

    /// Behave like an asynchronous host driven by `scheduler`
    pub fn with_scheduler(mut self, scheduler: ManualScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Report that the test engine cannot run on this host
    pub fn without_test_engine(mut self) -> Self {
        self.test_engine = false;
        self
    }

    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }
}

impl Backend for HeadlessBackend {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        ContextAttributes::new(GraphicsVersion::software())
    }

    fn shading_language_version(&self) -> &'static str {
        "none"
    }

    fn create_surface(&mut self, window: &WindowConfig, attributes: &ContextAttributes) -> Result<()> {
        if self.fail_surface {
            return Err(PlatformError::ContextCreation(format!(
                "headless surface for '{}' disabled",
                window.title
            )));
        }
        if self.width == 0 || self.height == 0 {
            self.width = window.width;
            self.height = window.height;
        }
        self.surface = true;
        self.probe.state.borrow_mut().attributes = Some(*attributes);
        tracing::debug!("Headless surface {}x{}", self.width, self.height);
        Ok(())
    }

    fn init_loader(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) {
        self.probe.state.borrow_mut().swap_interval = Some(interval);
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        self.polls += 1;
        let poll = self.polls;
        for (_, event) in self.scripted.iter().filter(|(at, _)| *at == poll) {
            if let Event::Window(WindowEvent::Resized { width, height }) = event {
                self.width = *width;
                self.height = *height;
            }
            events.push(event.clone());
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        if !self.surface {
            return Err(PlatformError::NoSurface);
        }
        let mut image = Framebuffer::new(self.width, self.height);
        image.rasterize(frame, (0.0, 0.0), RasterOptions::default());
        let mut state = self.probe.state.borrow_mut();
        state.presented += 1;
        state.last_frame = Some(image);
        Ok(())
    }

    fn destroy(&mut self) {
        self.surface = false;
        self.probe.state.borrow_mut().destroyed = true;
    }

    fn scheduler(&mut self) -> Option<Box<dyn HostScheduler>> {
        self.scheduler
            .take()
            .map(|scheduler| Box::new(scheduler) as Box<dyn HostScheduler>)
    }

    fn supports_test_engine(&self) -> bool {
        self.test_engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_platform::{GraphicsApi, Rect};

    #[test]
    fn test_present_requires_surface() {
        let mut backend = HeadlessBackend::new(8, 8);
        assert_eq!(backend.present(&DrawList::default()), Err(PlatformError::NoSurface));

        let attributes = backend.select_graphics_version();
        assert_eq!(attributes.version.api, GraphicsApi::Software);
        backend
            .create_surface(&WindowConfig::default(), &attributes)
            .unwrap();
        let mut list = DrawList::new([0, 0, 0, 255]);
        list.push_rect(Rect::new(2.0, 2.0, 2.0, 2.0), [255, 0, 0, 255]);
        backend.present(&list).unwrap();

        let probe = backend.probe();
        assert_eq!(probe.presented(), 1);
        let frame = probe.last_frame().unwrap();
        assert_eq!(frame.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_zero_size_uses_window_config() {
        let mut backend = HeadlessBackend::new(0, 0);
        let attributes = backend.select_graphics_version();
        backend
            .create_surface(&WindowConfig::new("t").size(640, 480), &attributes)
            .unwrap();
        assert_eq!(backend.surface_size(), (640, 480));
    }

    #[test]
    fn test_scripted_events_and_resize() {
        let mut backend = HeadlessBackend::new(100, 100)
            .with_event(2, Event::Window(WindowEvent::Resized { width: 50, height: 40 }));
        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert!(events.is_empty());
        backend.poll_events(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(backend.surface_size(), (50, 40));
    }

    #[test]
    fn test_scheduler_is_handed_out_once() {
        let mut backend = HeadlessBackend::new(1, 1).with_scheduler(ManualScheduler::new());
        assert!(backend.scheduler().is_some());
        assert!(backend.scheduler().is_none());
    }
}
