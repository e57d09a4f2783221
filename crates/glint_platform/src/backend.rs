//! Backend capability trait

use crate::draw::DrawList;
use crate::error::Result;
use crate::event::Event;
use crate::graphics::{ContextAttributes, SwapInterval};
use crate::scheduler::HostScheduler;
use crate::window::WindowConfig;

/// Capability provider for one host environment
///
/// The runner owns its backend for its whole lifetime and is the only caller.
/// Setup calls happen once, in order: [`select_graphics_version`],
/// [`create_surface`], [`init_loader`], [`set_swap_interval`]. Afterwards
/// every frame calls [`poll_events`] then [`present`].
///
/// [`select_graphics_version`]: Backend::select_graphics_version
/// [`create_surface`]: Backend::create_surface
/// [`init_loader`]: Backend::init_loader
/// [`set_swap_interval`]: Backend::set_swap_interval
/// [`poll_events`]: Backend::poll_events
/// [`present`]: Backend::present
pub trait Backend {
    /// Short backend name, e.g. "desktop", "web", "headless"
    fn name(&self) -> &'static str;

    /// Choose graphics API version, profile and context attributes
    fn select_graphics_version(&mut self) -> ContextAttributes;

    /// Shading language version header matching the selected context
    fn shading_language_version(&self) -> &'static str;

    /// Create the window/canvas and its graphics surface
    fn create_surface(&mut self, window: &WindowConfig, attributes: &ContextAttributes)
        -> Result<()>;

    /// Initialize the graphics function loader / device
    fn init_loader(&mut self) -> Result<()>;

    fn set_swap_interval(&mut self, interval: SwapInterval);

    /// Drain pending host events into `events`
    fn poll_events(&mut self, events: &mut Vec<Event>);

    /// Current drawable size in physical pixels
    fn surface_size(&self) -> (u32, u32);

    /// Present one frame
    fn present(&mut self, frame: &DrawList) -> Result<()>;

    /// Release the surface; called once at teardown
    fn destroy(&mut self);

    /// Asynchronous hosts return the scheduler that will own the frame loop.
    /// Called once, when the runner is constructed.
    fn scheduler(&mut self) -> Option<Box<dyn HostScheduler>> {
        None
    }

    /// Whether the scripted test engine can run on this host
    fn supports_test_engine(&self) -> bool {
        true
    }
}
