//! Glint Desktop Platform
//!
//! Blocking backend for macOS, Windows and Linux: a winit window whose event
//! loop is pumped once per frame, presented with wgpu.
//!
//! # Example
//!
//! ```ignore
//! use glint_platform_desktop::DesktopBackend;
//! use glint_runner::{AbstractRunner, AppRunner, RunConfiguration};
//!
//! let config = RunConfiguration::new(|cx| {
//!     cx.ui().window("Main", |ui| ui.text("Hello"));
//! });
//! AppRunner::new(config, Box::new(DesktopBackend::new())).run()?;
//! ```

mod app;
pub mod input;
pub mod renderer;
pub mod window;

use app::DesktopApp;
use glint_platform::{
    Backend, ContextAttributes, DrawList, Event, GraphicsVersion, PlatformError, Result,
    SwapInterval, WindowConfig, WindowEvent,
};
use renderer::Renderer;
use std::time::Duration;
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};

/// Pumps allowed for the platform to deliver `resumed` and create the window
const MAX_STARTUP_PUMPS: usize = 100;

fn present_mode(interval: SwapInterval) -> wgpu::PresentMode {
    match interval {
        SwapInterval::VSync => wgpu::PresentMode::AutoVsync,
        SwapInterval::Immediate => wgpu::PresentMode::AutoNoVsync,
    }
}

/// winit + wgpu backend
pub struct DesktopBackend {
    event_loop: Option<EventLoop<()>>,
    app: DesktopApp,
    instance: Option<wgpu::Instance>,
    surface: Option<wgpu::Surface<'static>>,
    renderer: Option<Renderer>,
    present_mode: wgpu::PresentMode,
    size: (u32, u32),
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopBackend {
    /// Nothing touches the OS until `create_surface`
    pub fn new() -> Self {
        Self {
            event_loop: None,
            app: DesktopApp::new(WindowConfig::default()),
            instance: None,
            surface: None,
            renderer: None,
            present_mode: present_mode(SwapInterval::default()),
            size: (0, 0),
        }
    }

    fn pump(&mut self) -> bool {
        match self.event_loop.as_mut() {
            Some(event_loop) => matches!(
                event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app),
                PumpStatus::Continue
            ),
            None => false,
        }
    }
}

impl Backend for DesktopBackend {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn select_graphics_version(&mut self) -> ContextAttributes {
        ContextAttributes::new(GraphicsVersion::native())
            .forward_compatible(cfg!(target_os = "macos"))
            .debug(cfg!(debug_assertions))
    }

    fn shading_language_version(&self) -> &'static str {
        "WGSL"
    }

    fn create_surface(&mut self, window: &WindowConfig, attributes: &ContextAttributes) -> Result<()> {
        tracing::debug!("Creating desktop surface ({})", attributes.version);
        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        self.event_loop = Some(event_loop);
        self.app = DesktopApp::new(window.clone());

        for _ in 0..MAX_STARTUP_PUMPS {
            if !self.pump() {
                return Err(PlatformError::EventLoop(
                    "event loop exited during startup".to_string(),
                ));
            }
            if self.app.window.is_some() || self.app.error.is_some() {
                break;
            }
        }
        if let Some(error) = self.app.error.take() {
            return Err(PlatformError::WindowCreation(error));
        }
        let handle = self
            .app
            .window
            .clone()
            .ok_or_else(|| PlatformError::WindowCreation("window was never created".to_string()))?;

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let size = handle.inner_size();
        let surface = instance
            .create_surface(handle)
            .map_err(|e| PlatformError::ContextCreation(e.to_string()))?;

        self.size = (size.width, size.height);
        self.instance = Some(instance);
        self.surface = Some(surface);
        Ok(())
    }

    fn init_loader(&mut self) -> Result<()> {
        let (Some(instance), Some(surface)) = (self.instance.as_ref(), self.surface.as_ref()) else {
            return Err(PlatformError::NoSurface);
        };
        let renderer = pollster::block_on(Renderer::new(
            instance,
            surface,
            self.size,
            self.present_mode,
        ))?;
        self.renderer = Some(renderer);
        Ok(())
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) {
        self.present_mode = present_mode(interval);
        if let (Some(renderer), Some(surface)) = (self.renderer.as_mut(), self.surface.as_ref()) {
            renderer.set_present_mode(surface, self.present_mode);
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        if self.event_loop.is_some() && !self.pump() {
            self.app
                .events
                .push(Event::Window(WindowEvent::CloseRequested));
        }
        for event in self.app.events.drain(..) {
            if let Event::Window(WindowEvent::Resized { width, height }) = event {
                self.size = (width, height);
                if let (Some(renderer), Some(surface)) =
                    (self.renderer.as_mut(), self.surface.as_ref())
                {
                    renderer.resize(surface, width, height);
                }
            }
            events.push(event);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        self.size
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        match (self.renderer.as_mut(), self.surface.as_ref()) {
            (Some(renderer), Some(surface)) => renderer.render(surface, frame),
            _ => Err(PlatformError::NoSurface),
        }
    }

    fn destroy(&mut self) {
        self.renderer = None;
        self.surface = None;
        self.instance = None;
        self.app.window = None;
        self.event_loop = None;
        tracing::debug!("Desktop backend destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_selection() {
        let mut backend = DesktopBackend::new();
        let attributes = backend.select_graphics_version();
        assert_eq!(attributes.version, GraphicsVersion::native());
        assert_eq!(backend.shading_language_version(), "WGSL");
        assert!(backend.supports_test_engine());
        assert!(backend.scheduler().is_none());
    }

    #[test]
    fn test_nothing_before_surface() {
        let mut backend = DesktopBackend::new();
        assert_eq!(backend.present(&DrawList::default()), Err(PlatformError::NoSurface));
        assert_eq!(backend.init_loader(), Err(PlatformError::NoSurface));
        let mut events = Vec::new();
        backend.poll_events(&mut events);
        assert!(events.is_empty());
        backend.destroy();
    }

    #[test]
    fn test_swap_interval_maps_to_present_mode() {
        assert_eq!(present_mode(SwapInterval::VSync), wgpu::PresentMode::AutoVsync);
        assert_eq!(present_mode(SwapInterval::Immediate), wgpu::PresentMode::AutoNoVsync);
    }
}
