//! Window configuration

use serde::{Deserialize, Serialize};

/// Window (or canvas) configuration handed to a backend during setup
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Logical pixels; browser hosts fall back to this until the canvas is
    /// laid out
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub decorations: bool,
    /// Borderless fullscreen on the current monitor
    pub fullscreen: bool,
    /// DOM id of the `<canvas>` (browser hosts only)
    pub canvas_id: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Glint App".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            decorations: true,
            fullscreen: false,
            canvas_id: "glint-canvas".to_string(),
        }
    }
}

impl WindowConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = WindowConfig::new("demo").size(640, 480).resizable(false);
        assert_eq!(config.title, "demo");
        assert_eq!((config.width, config.height), (640, 480));
        assert!(!config.resizable);
        assert_eq!(config.canvas_id, "glint-canvas");
    }
}
