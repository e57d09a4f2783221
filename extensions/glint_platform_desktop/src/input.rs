//! Desktop input conversion (winit -> glint_platform)

use glint_platform::{
    InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent,
};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Pixels per scroll line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 10.0;

pub fn convert_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

pub fn convert_key_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    }
}

pub fn convert_modifiers(modifiers: ModifiersState) -> Modifiers {
    let mut held = Modifiers::empty();
    held.set(Modifiers::SHIFT, modifiers.shift_key());
    held.set(Modifiers::CTRL, modifiers.control_key());
    held.set(Modifiers::ALT, modifiers.alt_key());
    held.set(Modifiers::META, modifiers.super_key());
    held
}

pub fn convert_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => match named {
            NamedKey::Enter => Key::Enter,
            NamedKey::Escape => Key::Escape,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::ArrowLeft => Key::Left,
            NamedKey::ArrowRight => Key::Right,
            NamedKey::ArrowUp => Key::Up,
            NamedKey::ArrowDown => Key::Down,
            _ => Key::Unknown,
        },
        WinitKey::Character(c) => match c.chars().next() {
            Some(ch) => Key::Char(ch),
            None => Key::Unknown,
        },
        _ => Key::Unknown,
    }
}

pub fn convert_keyboard_event(
    key: &WinitKey,
    state: ElementState,
    modifiers: ModifiersState,
) -> InputEvent {
    InputEvent::Keyboard(KeyboardEvent {
        key: convert_key(key),
        state: convert_key_state(state),
        modifiers: convert_modifiers(modifiers),
    })
}

pub fn mouse_button(state: ElementState, button: WinitMouseButton, x: f32, y: f32) -> InputEvent {
    let button = convert_mouse_button(button);
    InputEvent::Mouse(match state {
        ElementState::Pressed => MouseEvent::ButtonPressed { button, x, y },
        ElementState::Released => MouseEvent::ButtonReleased { button, x, y },
    })
}

pub fn scroll_event(delta: MouseScrollDelta) -> InputEvent {
    let (delta_x, delta_y) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pos) => (
            pos.x as f32 / PIXELS_PER_LINE,
            pos.y as f32 / PIXELS_PER_LINE,
        ),
    };
    InputEvent::Scroll { delta_x, delta_y }
}
