//! Screenshot capture
//!
//! The engine decides *what* to capture (which window, which region, with or
//! without cursor and background) and rasterizes it through the UI driver.
//! A [`CaptureSink`] decides where the pixels go.

use crate::error::CaptureError;
use crate::registry::TestId;
use bitflags::bitflags;
use glint_platform::Framebuffer;
use image::RgbaImage;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

bitflags! {
    /// Options for [`Step::CaptureScreenshotWindow`](crate::Step::CaptureScreenshotWindow)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CaptureFlags: u32 {
        /// Capture the window's full content rect, even past the surface edge
        const STITCH_ALL = 1 << 0;
        const HIDE_MOUSE_CURSOR = 1 << 1;
        /// Capture in the current frame instead of waiting one frame
        const INSTANT = 1 << 2;
        /// Leave the clear color out (transparent background)
        const NO_BACKGROUND = 1 << 3;
    }
}

/// Metadata for one captured image
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureRecord {
    pub test: TestId,
    pub window: String,
    /// Per-run capture counter
    pub index: u32,
    /// Frame the capture was taken on
    pub frame: u64,
    pub width: u32,
    pub height: u32,
    /// Where the sink stored the image, if it wrote a file
    pub path: Option<PathBuf>,
}

/// Destination for captured images
pub trait CaptureSink {
    /// Store one image; returns the file path when one was written
    fn save(
        &mut self,
        record: &CaptureRecord,
        image: &Framebuffer,
    ) -> Result<Option<PathBuf>, CaptureError>;
}

/// Writes one PNG per capture into a directory
#[derive(Clone, Debug)]
pub struct PngCaptureSink {
    dir: PathBuf,
}

impl PngCaptureSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{category}_{name}_{window}_{index}.png`, with anything outside
    /// `[A-Za-z0-9-]` replaced by `_`
    pub fn file_name(record: &CaptureRecord) -> String {
        format!(
            "{}_{}_{}_{:04}.png",
            sanitize(&record.test.category),
            sanitize(&record.test.name),
            sanitize(&record.window),
            record.index
        )
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

impl CaptureSink for PngCaptureSink {
    fn save(
        &mut self,
        record: &CaptureRecord,
        image: &Framebuffer,
    ) -> Result<Option<PathBuf>, CaptureError> {
        let path = self.dir.join(Self::file_name(record));
        let write_error = |reason: String| CaptureError::Write {
            path: path.clone(),
            reason,
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| write_error(e.to_string()))?;
        let img = RgbaImage::from_raw(image.width(), image.height(), image.pixels().to_vec())
            .ok_or(CaptureError::InvalidBuffer {
                width: image.width(),
                height: image.height(),
            })?;
        img.save(&path).map_err(|e| write_error(e.to_string()))?;

        tracing::info!("Saved screenshot {}", path.display());
        Ok(Some(path))
    }
}

/// Keeps captures in memory; clones share the same storage
#[derive(Clone, Debug, Default)]
pub struct MemoryCaptureSink {
    captures: Rc<RefCell<Vec<(CaptureRecord, Framebuffer)>>>,
}

impl MemoryCaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.captures.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.borrow().is_empty()
    }

    /// Snapshot of everything captured so far
    pub fn captures(&self) -> Vec<(CaptureRecord, Framebuffer)> {
        self.captures.borrow().clone()
    }
}

impl CaptureSink for MemoryCaptureSink {
    fn save(
        &mut self,
        record: &CaptureRecord,
        image: &Framebuffer,
    ) -> Result<Option<PathBuf>, CaptureError> {
        self.captures
            .borrow_mut()
            .push((record.clone(), image.clone()));
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(window: &str) -> CaptureRecord {
        CaptureRecord {
            test: TestId::new("demo_tests", "capture_screenshot"),
            window: window.to_string(),
            index: 1,
            frame: 10,
            width: 4,
            height: 2,
            path: None,
        }
    }

    #[test]
    fn test_file_name_is_sanitized() {
        assert_eq!(
            PngCaptureSink::file_name(&record("Glint Demo")),
            "demo_tests_capture_screenshot_Glint_Demo_0001.png"
        );
    }

    #[test]
    fn test_png_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngCaptureSink::new(dir.path().join("shots"));
        let mut fb = Framebuffer::new(4, 2);
        fb.fill([255, 0, 0, 255]);

        let path = sink.save(&record("Glint Demo"), &fb).unwrap().unwrap();
        assert!(path.exists());
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_memory_sink_shares_storage() {
        let sink = MemoryCaptureSink::new();
        let mut writer = sink.clone();
        writer.save(&record("w"), &Framebuffer::new(1, 1)).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.captures()[0].0.window, "w");
    }

    #[test]
    fn test_flags_combine() {
        let flags = CaptureFlags::STITCH_ALL | CaptureFlags::HIDE_MOUSE_CURSOR;
        assert!(flags.contains(CaptureFlags::STITCH_ALL));
        assert!(!flags.contains(CaptureFlags::INSTANT));
        assert_eq!(CaptureFlags::default(), CaptureFlags::empty());
    }
}
