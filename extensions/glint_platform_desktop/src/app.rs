//! winit application handler collecting events between pumps

use crate::input;
use crate::window::window_attributes;
use glint_platform::{Event, InputEvent, LifecycleEvent, MouseEvent, WindowConfig, WindowEvent};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent as WinitWindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

/// Receives winit callbacks during `pump_app_events` and queues them as
/// platform events for the next `poll_events`
pub(crate) struct DesktopApp {
    config: WindowConfig,
    pub(crate) window: Option<Arc<Window>>,
    pub(crate) events: Vec<Event>,
    pub(crate) error: Option<String>,
    modifiers: ModifiersState,
    mouse_position: (f32, f32),
}

impl DesktopApp {
    pub(crate) fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            events: Vec::new(),
            error: None,
            modifiers: ModifiersState::empty(),
            mouse_position: (0.0, 0.0),
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match event_loop.create_window(window_attributes(&self.config)) {
                Ok(window) => {
                    tracing::debug!("Created window '{}'", self.config.title);
                    self.window = Some(Arc::new(window));
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {}", e);
                    self.error = Some(e.to_string());
                    return;
                }
            }
        }
        self.events.push(Event::Lifecycle(LifecycleEvent::Resumed));
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.events.push(Event::Lifecycle(LifecycleEvent::Suspended));
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        let event = match event {
            WinitWindowEvent::CloseRequested => Event::Window(WindowEvent::CloseRequested),
            WinitWindowEvent::Resized(size) => Event::Window(WindowEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WinitWindowEvent::Focused(focused) => Event::Window(WindowEvent::Focused(focused)),
            WinitWindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Event::Window(WindowEvent::ScaleFactorChanged { scale_factor })
            }
            WinitWindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                return;
            }
            WinitWindowEvent::KeyboardInput { event, .. } => Event::Input(
                input::convert_keyboard_event(&event.logical_key, event.state, self.modifiers),
            ),
            WinitWindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
                let (x, y) = self.mouse_position;
                Event::Input(InputEvent::Mouse(MouseEvent::Moved { x, y }))
            }
            WinitWindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.mouse_position;
                Event::Input(input::mouse_button(state, button, x, y))
            }
            WinitWindowEvent::MouseWheel { delta, .. } => Event::Input(input::scroll_event(delta)),
            WinitWindowEvent::CursorEntered { .. } => {
                Event::Input(InputEvent::Mouse(MouseEvent::Entered))
            }
            WinitWindowEvent::CursorLeft { .. } => Event::Input(InputEvent::Mouse(MouseEvent::Left)),
            _ => return,
        };
        self.events.push(event);
    }
}
