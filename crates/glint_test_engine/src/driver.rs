//! Seams between the engine and the UI it drives

use crate::item::{ItemAction, ItemId, ItemInfo};
use glint_platform::{Framebuffer, RasterOptions, Rect};

/// The engine's view of the immediate-mode UI
///
/// Queried once per frame, after the frame callback has submitted every item.
pub trait UiDriver {
    /// Items submitted during the frame that just ended, in submission order
    fn items(&self) -> &[ItemInfo];

    /// Whether `id` was clicked during the frame that just ended
    fn was_activated(&self, id: ItemId) -> bool;

    /// Queue an action; it takes effect when the next frame begins
    fn inject(&mut self, id: ItemId, action: ItemAction);

    /// Surface size in pixels
    fn surface_size(&self) -> (u32, u32);

    /// Rasterize `region` of the last frame
    fn rasterize(&self, region: Rect, options: RasterOptions) -> Framebuffer;
}

/// Minimal widget surface used to draw the engine's own windows
pub trait EngineUi {
    fn begin_window(&mut self, title: &str);
    fn text(&mut self, text: &str);
    fn end_window(&mut self);
}
