//! Input events as backends report them
//!
//! Pointer positions are in surface pixels with the origin at the top-left.

use bitflags::bitflags;

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Keyboard(KeyboardEvent),
    /// Wheel or touchpad scroll, in lines
    Scroll { delta_x: f32, delta_y: f32 },
}

impl InputEvent {
    /// Cursor position carried by this event, if any
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            InputEvent::Mouse(MouseEvent::Moved { x, y })
            | InputEvent::Mouse(MouseEvent::ButtonPressed { x, y, .. })
            | InputEvent::Mouse(MouseEvent::ButtonReleased { x, y, .. }) => Some((*x, *y)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    Moved { x: f32, y: f32 },
    ButtonPressed { button: MouseButton, x: f32, y: f32 },
    ButtonReleased { button: MouseButton, x: f32, y: f32 },
    /// The pointer entered the surface
    Entered,
    /// The pointer left the surface; there is no position until it returns
    Left,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Extra buttons by host index
    Other(u16),
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub state: KeyState,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

bitflags! {
    /// Modifier keys held while an event happened
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Command on macOS, the Windows key elsewhere
        const META = 1 << 3;
    }
}

/// Keys the runtime distinguishes; everything printable arrives as `Char`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    Left,
    Right,
    Up,
    Down,
    Char(char),
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_of_mouse_events() {
        let pressed = InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 4.0,
            y: 8.0,
        });
        assert_eq!(pressed.position(), Some((4.0, 8.0)));
        assert_eq!(InputEvent::Mouse(MouseEvent::Left).position(), None);
        assert_eq!(
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: 1.0
            }
            .position(),
            None
        );
    }

    #[test]
    fn test_modifiers() {
        assert!(Modifiers::default().is_empty());
        let held = Modifiers::SHIFT | Modifiers::META;
        assert!(held.contains(Modifiers::SHIFT));
        assert!(!held.contains(Modifiers::CTRL));
    }
}
