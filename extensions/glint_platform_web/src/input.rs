//! DOM event conversion and listener bookkeeping

use glint_platform::{
    Event, InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent,
    WindowEvent,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

/// `WheelEvent.deltaMode` values
const DOM_DELTA_PIXEL: u32 = 0;
const DOM_DELTA_LINE: u32 = 1;

/// Pixels per scroll line for pixel-mode wheel deltas
const PIXELS_PER_LINE: f32 = 10.0;
/// Lines per page for page-mode wheel deltas
const LINES_PER_PAGE: f32 = 20.0;

/// Events shared between DOM listeners and `poll_events`
pub type EventQueue = Rc<RefCell<Vec<Event>>>;

/// `MouseEvent.button` to platform button
pub fn mouse_button(button: i16) -> MouseButton {
    match button {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        n => MouseButton::Other(n.max(0) as u16),
    }
}

/// `KeyboardEvent.key` to platform key
pub fn key(name: &str) -> Key {
    match name {
        "Enter" => Key::Enter,
        "Escape" => Key::Escape,
        "Backspace" => Key::Backspace,
        "Tab" => Key::Tab,
        " " => Key::Space,
        "ArrowLeft" => Key::Left,
        "ArrowRight" => Key::Right,
        "ArrowUp" => Key::Up,
        "ArrowDown" => Key::Down,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Char(ch),
                _ => Key::Unknown,
            }
        }
    }
}

/// Wheel deltas in lines
pub fn scroll(delta_x: f64, delta_y: f64, delta_mode: u32) -> InputEvent {
    let scale = match delta_mode {
        DOM_DELTA_PIXEL => 1.0 / PIXELS_PER_LINE,
        DOM_DELTA_LINE => 1.0,
        _ => LINES_PER_PAGE,
    };
    InputEvent::Scroll {
        delta_x: delta_x as f32 * scale,
        delta_y: delta_y as f32 * scale,
    }
}

fn translate(kind: &str, event: &web_sys::Event, pixel_ratio: f32) -> Option<Event> {
    if let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
        let state = match kind {
            "keydown" => KeyState::Pressed,
            _ => KeyState::Released,
        };
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, key_event.shift_key());
        modifiers.set(Modifiers::CTRL, key_event.ctrl_key());
        modifiers.set(Modifiers::ALT, key_event.alt_key());
        modifiers.set(Modifiers::META, key_event.meta_key());
        return Some(Event::Input(InputEvent::Keyboard(KeyboardEvent {
            key: key(&key_event.key()),
            state,
            modifiers,
        })));
    }
    if let Some(wheel) = event.dyn_ref::<web_sys::WheelEvent>() {
        return Some(Event::Input(scroll(
            wheel.delta_x(),
            wheel.delta_y(),
            wheel.delta_mode(),
        )));
    }
    if let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() {
        let x = mouse.offset_x() as f32 * pixel_ratio;
        let y = mouse.offset_y() as f32 * pixel_ratio;
        let button = mouse_button(mouse.button());
        let mouse_event = match kind {
            "mousemove" => MouseEvent::Moved { x, y },
            "mousedown" => MouseEvent::ButtonPressed { button, x, y },
            "mouseup" => MouseEvent::ButtonReleased { button, x, y },
            "mouseenter" => MouseEvent::Entered,
            "mouseleave" => MouseEvent::Left,
            _ => return None,
        };
        return Some(Event::Input(InputEvent::Mouse(mouse_event)));
    }
    match kind {
        "focus" => Some(Event::Window(WindowEvent::Focused(true))),
        "blur" => Some(Event::Window(WindowEvent::Focused(false))),
        _ => None,
    }
}

/// DOM events forwarded from the canvas
pub const CANVAS_EVENTS: [&str; 10] = [
    "mousemove",
    "mousedown",
    "mouseup",
    "mouseenter",
    "mouseleave",
    "wheel",
    "keydown",
    "keyup",
    "focus",
    "blur",
];

/// One attached listener; removed from its target by [`Listener::detach`]
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        kind: &'static str,
        queue: EventQueue,
        pixel_ratio: f32,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Some(event) = translate(kind, &event, pixel_ratio) {
                queue.borrow_mut().push(event);
            }
        });
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub fn detach(self) {
        let callback: &js_sys::Function = self.closure.as_ref().unchecked_ref();
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, callback)
        {
            tracing::warn!("Failed to remove '{}' listener: {:?}", self.kind, e);
        }
    }
}
