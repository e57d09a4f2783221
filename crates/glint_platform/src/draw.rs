//! Flat draw lists and a CPU framebuffer
//!
//! The UI surface lowers each frame into a [`DrawList`] of solid rectangles.
//! GPU backends upload it; the headless backend and screenshot capture
//! rasterize it with [`Framebuffer::rasterize`].

/// Axis-aligned rectangle in surface pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Intersection, or an empty rect at the origin when disjoint
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// A single draw command
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle, straight RGBA8
    Rect { rect: Rect, color: [u8; 4] },
    /// Mouse cursor marker
    Cursor { x: f32, y: f32 },
}

/// Everything drawn in one frame, in painter's order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub clear_color: [u8; 4],
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(clear_color: [u8; 4]) -> Self {
        Self {
            clear_color,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self, clear_color: [u8; 4]) {
        self.clear_color = clear_color;
        self.commands.clear();
    }

    pub fn push_rect(&mut self, rect: Rect, color: [u8; 4]) -> usize {
        self.commands.push(DrawCommand::Rect { rect, color });
        self.commands.len() - 1
    }

    /// Replace the rect of a previously pushed command (window backgrounds
    /// are sized after their contents)
    pub fn set_rect(&mut self, index: usize, new_rect: Rect) {
        if let Some(DrawCommand::Rect { rect, .. }) = self.commands.get_mut(index) {
            *rect = new_rect;
        }
    }

    pub fn push_cursor(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Cursor { x, y });
    }

    /// Bounding box of all rect commands
    pub fn bounds(&self) -> Option<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { rect, .. } => Some(*rect),
                DrawCommand::Cursor { .. } => None,
            })
            .reduce(|a, b| a.union(&b))
    }
}

/// Options for [`Framebuffer::rasterize`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterOptions {
    /// Draw cursor markers
    pub draw_cursor: bool,
    /// Clear to the list's clear color (transparent otherwise)
    pub draw_background: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            draw_cursor: true,
            draw_background: true,
        }
    }
}

const CURSOR_SIZE: f32 = 8.0;
const CURSOR_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Tightly packed RGBA8 pixels, row-major, top-left origin
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Source-over blend a solid rect, clipped to the buffer
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let bounds = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
        let clipped = rect.intersect(&bounds);
        if clipped.is_empty() || color[3] == 0 {
            return;
        }
        let x0 = clipped.x.floor() as usize;
        let y0 = clipped.y.floor() as usize;
        let x1 = (clipped.right().ceil() as usize).min(self.width as usize);
        let y1 = (clipped.bottom().ceil() as usize).min(self.height as usize);
        let alpha = color[3] as u32;
        for y in y0..y1 {
            let row = y * self.width as usize;
            for x in x0..x1 {
                let i = (row + x) * 4;
                let dst = &mut self.pixels[i..i + 4];
                if alpha == 255 {
                    dst.copy_from_slice(&color);
                    continue;
                }
                for c in 0..3 {
                    let blended = (color[c] as u32 * alpha + dst[c] as u32 * (255 - alpha)) / 255;
                    dst[c] = blended as u8;
                }
                dst[3] = (alpha + dst[3] as u32 * (255 - alpha) / 255).min(255) as u8;
            }
        }
    }

    /// Paint a draw list, with `origin` mapping to the buffer's top-left
    pub fn rasterize(&mut self, list: &DrawList, origin: (f32, f32), options: RasterOptions) {
        if options.draw_background {
            self.fill(list.clear_color);
        } else {
            self.fill([0, 0, 0, 0]);
        }
        for command in &list.commands {
            match command {
                DrawCommand::Rect { rect, color } => {
                    let moved = Rect::new(rect.x - origin.0, rect.y - origin.1, rect.width, rect.height);
                    self.fill_rect(moved, *color);
                }
                DrawCommand::Cursor { x, y } if options.draw_cursor => {
                    let marker = Rect::new(x - origin.0, y - origin.1, CURSOR_SIZE, CURSOR_SIZE);
                    self.fill_rect(marker, CURSOR_COLOR);
                }
                DrawCommand::Cursor { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BG: [u8; 4] = [10, 10, 10, 255];

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Rect::new(5.0, 5.0, 5.0, 5.0));
        assert!(a.intersect(&Rect::new(20.0, 20.0, 1.0, 1.0)).is_empty());
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn test_rasterize_rect_and_cursor() {
        let mut list = DrawList::new(BG);
        list.push_rect(Rect::new(2.0, 2.0, 4.0, 4.0), RED);
        list.push_cursor(10.0, 10.0);

        let mut fb = Framebuffer::new(20, 20);
        fb.rasterize(&list, (0.0, 0.0), RasterOptions::default());
        assert_eq!(fb.pixel(3, 3), Some(RED));
        assert_eq!(fb.pixel(0, 0), Some(BG));
        assert_eq!(fb.pixel(12, 12), Some(CURSOR_COLOR));

        let hidden = RasterOptions {
            draw_cursor: false,
            draw_background: true,
        };
        fb.rasterize(&list, (0.0, 0.0), hidden);
        assert_eq!(fb.pixel(12, 12), Some(BG));
    }

    #[test]
    fn test_rasterize_with_origin() {
        let mut list = DrawList::new(BG);
        list.push_rect(Rect::new(100.0, 100.0, 4.0, 4.0), RED);
        let mut fb = Framebuffer::new(4, 4);
        fb.rasterize(&list, (100.0, 100.0), RasterOptions::default());
        assert_eq!(fb.pixel(0, 0), Some(RED));
        assert_eq!(fb.pixel(4, 4), None);
    }

    #[test]
    fn test_set_rect_and_bounds() {
        let mut list = DrawList::default();
        let idx = list.push_rect(Rect::new(0.0, 0.0, 1.0, 1.0), RED);
        list.push_rect(Rect::new(5.0, 5.0, 1.0, 1.0), RED);
        list.set_rect(idx, Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(list.bounds(), Some(Rect::new(0.0, 0.0, 6.0, 6.0)));
    }
}
