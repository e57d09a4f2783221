//! Fully resolved style snapshot

use crate::color::Color;

/// Named color slots of a [`Style`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Text,
    TextDisabled,
    WindowBg,
    ChildBg,
    PopupBg,
    Border,
    BorderShadow,
    FrameBg,
    FrameBgHovered,
    FrameBgActive,
    TitleBg,
    TitleBgActive,
    TitleBgCollapsed,
    MenuBarBg,
    ScrollbarBg,
    ScrollbarGrab,
    ScrollbarGrabHovered,
    ScrollbarGrabActive,
    CheckMark,
    SliderGrab,
    SliderGrabActive,
    Button,
    ButtonHovered,
    ButtonActive,
    Header,
    HeaderHovered,
    HeaderActive,
    Separator,
    ResizeGrip,
    Tab,
    TabHovered,
    TabActive,
    TextSelectedBg,
    ModalWindowDimBg,
}

impl ColorSlot {
    pub const COUNT: usize = 34;

    pub const ALL: [ColorSlot; ColorSlot::COUNT] = [
        ColorSlot::Text,
        ColorSlot::TextDisabled,
        ColorSlot::WindowBg,
        ColorSlot::ChildBg,
        ColorSlot::PopupBg,
        ColorSlot::Border,
        ColorSlot::BorderShadow,
        ColorSlot::FrameBg,
        ColorSlot::FrameBgHovered,
        ColorSlot::FrameBgActive,
        ColorSlot::TitleBg,
        ColorSlot::TitleBgActive,
        ColorSlot::TitleBgCollapsed,
        ColorSlot::MenuBarBg,
        ColorSlot::ScrollbarBg,
        ColorSlot::ScrollbarGrab,
        ColorSlot::ScrollbarGrabHovered,
        ColorSlot::ScrollbarGrabActive,
        ColorSlot::CheckMark,
        ColorSlot::SliderGrab,
        ColorSlot::SliderGrabActive,
        ColorSlot::Button,
        ColorSlot::ButtonHovered,
        ColorSlot::ButtonActive,
        ColorSlot::Header,
        ColorSlot::HeaderHovered,
        ColorSlot::HeaderActive,
        ColorSlot::Separator,
        ColorSlot::ResizeGrip,
        ColorSlot::Tab,
        ColorSlot::TabHovered,
        ColorSlot::TabActive,
        ColorSlot::TextSelectedBg,
        ColorSlot::ModalWindowDimBg,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Window, popup and bar backgrounds; these take the background value
    /// multiplier and the alpha multiplier
    pub fn is_background(self) -> bool {
        matches!(
            self,
            ColorSlot::WindowBg
                | ColorSlot::ChildBg
                | ColorSlot::PopupBg
                | ColorSlot::TitleBg
                | ColorSlot::TitleBgActive
                | ColorSlot::TitleBgCollapsed
                | ColorSlot::MenuBarBg
                | ColorSlot::ScrollbarBg
                | ColorSlot::ModalWindowDimBg
        )
    }

    pub fn is_text(self) -> bool {
        matches!(self, ColorSlot::Text | ColorSlot::TextDisabled)
    }
}

/// Immutable, fully resolved visual style
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    colors: [Color; ColorSlot::COUNT],
    /// Global alpha applied to everything
    pub alpha: f32,
    pub window_rounding: f32,
    pub child_rounding: f32,
    pub popup_rounding: f32,
    pub frame_rounding: f32,
    pub grab_rounding: f32,
    pub tab_rounding: f32,
    pub scrollbar_rounding: f32,
    pub window_border_size: f32,
    pub frame_border_size: f32,
    pub window_padding: [f32; 2],
    pub frame_padding: [f32; 2],
    pub item_spacing: [f32; 2],
    pub scrollbar_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            colors: [Color::TRANSPARENT; ColorSlot::COUNT],
            alpha: 1.0,
            window_rounding: 0.0,
            child_rounding: 0.0,
            popup_rounding: 0.0,
            frame_rounding: 0.0,
            grab_rounding: 0.0,
            tab_rounding: 4.0,
            scrollbar_rounding: 9.0,
            window_border_size: 1.0,
            frame_border_size: 0.0,
            window_padding: [8.0, 8.0],
            frame_padding: [4.0, 3.0],
            item_spacing: [8.0, 4.0],
            scrollbar_size: 14.0,
        }
    }
}

impl Style {
    pub fn color(&self, slot: ColorSlot) -> Color {
        self.colors[slot.index()]
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: Color) {
        self.colors[slot.index()] = color;
    }

    pub fn colors(&self) -> &[Color; ColorSlot::COUNT] {
        &self.colors
    }

    /// Apply `f` to every slot
    pub fn map_colors(&mut self, mut f: impl FnMut(ColorSlot, Color) -> Color) {
        for slot in ColorSlot::ALL {
            let i = slot.index();
            self.colors[i] = f(slot, self.colors[i]);
        }
    }

    /// Same rounding on every widget surface; the scrollbar is left alone
    pub fn set_rounding(&mut self, rounding: f32) {
        self.window_rounding = rounding;
        self.child_rounding = rounding;
        self.popup_rounding = rounding;
        self.frame_rounding = rounding;
        self.grab_rounding = rounding;
        self.tab_rounding = rounding;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_table_matches_indices() {
        for (i, slot) in ColorSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_map_colors_visits_every_slot() {
        let mut style = Style::default();
        let mut seen = 0;
        style.map_colors(|_, _| {
            seen += 1;
            Color::WHITE
        });
        assert_eq!(seen, ColorSlot::COUNT);
        assert_eq!(style.color(ColorSlot::ModalWindowDimBg), Color::WHITE);
    }
}
