//! Window creation

use glint_platform::WindowConfig;
use winit::dpi::LogicalSize;
use winit::window::{Fullscreen, WindowAttributes};

/// winit attributes for a [`WindowConfig`]
pub fn window_attributes(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(config.decorations);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_follow_config() {
        let attrs = window_attributes(&WindowConfig::new("Demo").size(640, 480).fullscreen(true));
        assert_eq!(attrs.title, "Demo");
        assert!(attrs.fullscreen.is_some());
        assert!(attrs.resizable);
    }
}
