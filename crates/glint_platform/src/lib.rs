//! Glint Platform Abstraction Layer
//!
//! Platform-agnostic traits and types shared by every host backend.
//!
//! # Architecture
//!
//! - [`Backend`] - the small fixed set of primitive calls a runner makes
//!   (context selection, surface creation, loader init, swap interval,
//!   event polling, presentation)
//! - [`HostScheduler`] - how asynchronous hosts take over the frame loop
//! - [`DrawList`] / [`Framebuffer`] - the flat per-frame output and its CPU
//!   rasterizer
//!
//! # Backend Implementations
//!
//! - `glint_platform_desktop` - blocking winit + wgpu host
//! - `glint_platform_web` - asynchronous browser host (wasm32)
//! - `glint_runner::HeadlessBackend` - in-process blocking host for CI

mod backend;
mod draw;
mod error;
mod event;
mod graphics;
mod input;
mod scheduler;
mod window;

pub use backend::Backend;
pub use draw::{DrawCommand, DrawList, Framebuffer, RasterOptions, Rect};
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, LifecycleEvent, WindowEvent};
pub use graphics::{ContextAttributes, ContextProfile, GraphicsApi, GraphicsVersion, SwapInterval};
pub use input::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
pub use scheduler::{Cadence, FrameStep, HostScheduler};
pub use window::WindowConfig;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::Backend;
    pub use crate::draw::{DrawList, Framebuffer, Rect};
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event, WindowEvent};
    pub use crate::graphics::{ContextAttributes, GraphicsVersion, SwapInterval};
    pub use crate::scheduler::{Cadence, FrameStep, HostScheduler};
    pub use crate::window::WindowConfig;
}
