//! Host events delivered to the runner once per frame

use crate::input::InputEvent;

/// Control flow returned by a frame step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep invoking the frame step
    #[default]
    Continue,
    /// Stop; the host should drop the registration or leave its loop
    Exit,
}

impl ControlFlow {
    /// Whether this is [`ControlFlow::Exit`]
    pub fn is_exit(self) -> bool {
        self == ControlFlow::Exit
    }
}

/// Everything a backend reports from `poll_events`
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Window(WindowEvent),
    Input(InputEvent),
    Lifecycle(LifecycleEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// New drawable size in physical pixels
    Resized { width: u32, height: u32 },
    /// The user or the host asked to close the window; the runner treats it
    /// as an exit request
    CloseRequested,
    Focused(bool),
    ScaleFactorChanged { scale_factor: f64 },
}

/// Foreground/background transitions (window shown or hidden, tab visibility)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Resumed,
    Suspended,
}
