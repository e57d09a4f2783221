//! Glint Web Platform
//!
//! Asynchronous backend for `wasm32-unknown-unknown`. The page owns the frame
//! loop: the runner registers its step with [`BrowserScheduler`] and returns,
//! after which the browser invokes the step once per animation frame (or per
//! timer tick for a fixed cadence).
//!
//! Rendering uses a WebGL2 context on a `<canvas>` found by
//! [`WindowConfig::canvas_id`]. Browsers without shared-memory threads cannot
//! run the test engine alongside the page, so it is off unless enabled with
//! [`WebBackend::with_test_engine`].
//!
//! ```ignore
//! use glint_platform_web::WebBackend;
//! use glint_runner::{AbstractRunner, AppRunner, RunConfiguration};
//!
//! let config = RunConfiguration::new(|cx| cx.ui().text("Hello"));
//! let mut runner = AppRunner::new(config, Box::new(WebBackend::new()));
//! runner.run()?; // returns immediately; the browser drives frames
//! ```

pub mod canvas;
pub mod input;
mod scheduler;

pub use scheduler::BrowserScheduler;

use glint_platform::{
    Backend, ContextAttributes, DrawList, Event, GraphicsVersion, HostScheduler, PlatformError,
    Result, SwapInterval, WindowConfig, WindowEvent,
};
use input::{EventQueue, Listener, CANVAS_EVENTS};
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

/// Browser backend presenting on a WebGL2 canvas
pub struct WebBackend {
    canvas: Option<HtmlCanvasElement>,
    gl: Option<WebGl2RenderingContext>,
    queue: EventQueue,
    listeners: Vec<Listener>,
    scheduler: Option<BrowserScheduler>,
    size: (u32, u32),
    test_engine: bool,
}

impl Default for WebBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WebBackend {
    pub fn new() -> Self {
        Self {
            canvas: None,
            gl: None,
            queue: EventQueue::default(),
            listeners: Vec::new(),
            scheduler: Some(BrowserScheduler::new()),
            size: (0, 0),
            test_engine: false,
        }
    }

    /// Allow the test engine, for pages served with cross-origin isolation
    pub fn with_test_engine(mut self, enabled: bool) -> Self {
        self.test_engine = enabled;
        self
    }

    fn pixel_ratio() -> f32 {
        web_sys::window()
            .map(|window| window.device_pixel_ratio() as f32)
            .unwrap_or(1.0)
    }

    /// Match the drawing buffer to the canvas' CSS size, reporting a change
    fn sync_size(&mut self) -> Option<(u32, u32)> {
        let canvas = self.canvas.as_ref()?;
        let ratio = Self::pixel_ratio();
        let width = (canvas.client_width().max(0) as f32 * ratio) as u32;
        let height = (canvas.client_height().max(0) as f32 * ratio) as u32;
        if width == 0 || height == 0 || (width, height) == self.size {
            return None;
        }
        canvas.set_width(width);
        canvas.set_height(height);
        self.size = (width, height);
        Some(self.size)
    }
}

impl Backend for WebBackend {
    fn name(&self) -> &'static str {
        "web"
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        // WebGL2 is OpenGL ES 3.0; the browser decides depth/stencil
        ContextAttributes::new(GraphicsVersion::gles(3, 0))
    }

    fn shading_language_version(&self) -> &'static str {
        "#version 300 es"
    }

    fn create_surface(&mut self, window: &WindowConfig, attributes: &ContextAttributes) -> Result<()> {
        console_error_panic_hook::set_once();
        tracing::debug!("Creating canvas surface ({})", attributes.version);

        let canvas = canvas::find_canvas(&window.canvas_id)?;
        let gl = canvas::webgl2_context(&canvas)?;

        // Keyboard events need a focusable canvas
        canvas.set_tab_index(0);
        let ratio = Self::pixel_ratio();
        let target: &web_sys::EventTarget = canvas.as_ref();
        for kind in CANVAS_EVENTS {
            let listener = Listener::attach(target, kind, self.queue.clone(), ratio)
                .map_err(|e| PlatformError::InitFailed(format!("{:?}", e)))?;
            self.listeners.push(listener);
        }

        self.canvas = Some(canvas);
        self.gl = Some(gl);
        if self.sync_size().is_none() && self.size == (0, 0) {
            // Canvas not laid out yet; use the configured size
            if let Some(canvas) = self.canvas.as_ref() {
                canvas.set_width(window.width);
                canvas.set_height(window.height);
            }
            self.size = (window.width, window.height);
        }
        Ok(())
    }

    fn init_loader(&mut self) -> Result<()> {
        let gl = self.gl.as_ref().ok_or(PlatformError::NoSurface)?;
        let version = gl
            .get_parameter(WebGl2RenderingContext::VERSION)
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_else(|| "unknown".to_string());
        tracing::info!("WebGL ready: {}", version);
        Ok(())
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) {
        if interval == SwapInterval::Immediate {
            tracing::debug!("Browser compositing is always vsynced; ignoring immediate swap");
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        if let Some((width, height)) = self.sync_size() {
            events.push(Event::Window(WindowEvent::Resized { width, height }));
        }
        events.append(&mut *self.queue.borrow_mut());
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        let gl = self.gl.as_ref().ok_or(PlatformError::NoSurface)?;
        let (width, height) = self.size;
        canvas::paint(gl, frame, width, height);
        Ok(())
    }

    fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.queue.borrow_mut().clear();
        self.gl = None;
        self.canvas = None;
        tracing::debug!("Web backend destroyed");
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

    #[test]
    fn test_context_selection() {
        let mut backend = WebBackend::new();
        let attributes = backend.select_graphics_version();
        assert_eq!(attributes.version, GraphicsVersion::gles(3, 0));
        assert_eq!(backend.shading_language_version(), "#version 300 es");
        assert_eq!(backend.name(), "web");
    }

    #[test]
    fn test_scheduler_is_handed_out_once() {
        let mut backend = WebBackend::new();
        let scheduler = backend.scheduler();
        assert!(scheduler.is_some_and(|s| !s.is_registered()));
        assert!(backend.scheduler().is_none());
    }

    #[test]
    fn test_engine_is_opt_in() {
        assert!(!WebBackend::new().supports_test_engine());
        assert!(WebBackend::new().with_test_engine(true).supports_test_engine());
    }

    #[test]
    fn test_nothing_before_surface() {
        let mut backend = WebBackend::new();
        assert_eq!(backend.init_loader(), Err(PlatformError::NoSurface));
        assert_eq!(backend.present(&DrawList::default()), Err(PlatformError::NoSurface));
        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert!(events.is_empty());
    }
}
