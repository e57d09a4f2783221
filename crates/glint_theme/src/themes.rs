//! Built-in themes

use crate::color::Color;
use crate::error::ThemeError;
use crate::style::{ColorSlot, Style};
use crate::tweaks::{apply_tweaks, ThemeTweaks};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeId {
    ClassicColors,
    #[default]
    DarkColors,
    LightColors,
    MaterialFlat,
    PhotoshopStyle,
    GrayVariations,
    GrayVariationsDarker,
    MicrosoftStyle,
    Cherry,
    Darcula,
    LightRounded,
    SoDarkAccentBlue,
    SoDarkAccentYellow,
    SoDarkAccentRed,
    BlackIsBlack,
    WhiteIsWhite,
}

impl ThemeId {
    pub const ALL: [ThemeId; 16] = [
        ThemeId::ClassicColors,
        ThemeId::DarkColors,
        ThemeId::LightColors,
        ThemeId::MaterialFlat,
        ThemeId::PhotoshopStyle,
        ThemeId::GrayVariations,
        ThemeId::GrayVariationsDarker,
        ThemeId::MicrosoftStyle,
        ThemeId::Cherry,
        ThemeId::Darcula,
        ThemeId::LightRounded,
        ThemeId::SoDarkAccentBlue,
        ThemeId::SoDarkAccentYellow,
        ThemeId::SoDarkAccentRed,
        ThemeId::BlackIsBlack,
        ThemeId::WhiteIsWhite,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            ThemeId::ClassicColors => "ClassicColors",
            ThemeId::DarkColors => "DarkColors",
            ThemeId::LightColors => "LightColors",
            ThemeId::MaterialFlat => "MaterialFlat",
            ThemeId::PhotoshopStyle => "PhotoshopStyle",
            ThemeId::GrayVariations => "GrayVariations",
            ThemeId::GrayVariationsDarker => "GrayVariations_Darker",
            ThemeId::MicrosoftStyle => "MicrosoftStyle",
            ThemeId::Cherry => "Cherry",
            ThemeId::Darcula => "Darcula",
            ThemeId::LightRounded => "LightRounded",
            ThemeId::SoDarkAccentBlue => "SoDark_AccentBlue",
            ThemeId::SoDarkAccentYellow => "SoDark_AccentYellow",
            ThemeId::SoDarkAccentRed => "SoDark_AccentRed",
            ThemeId::BlackIsBlack => "BlackIsBlack",
            ThemeId::WhiteIsWhite => "WhiteIsWhite",
        }
    }

    /// Baseline style with no tweaks
    pub fn style(self) -> Style {
        match self {
            ThemeId::ClassicColors => classic().into_style(),
            ThemeId::DarkColors => dark().into_style(),
            ThemeId::LightColors => light().into_style(),
            ThemeId::MaterialFlat => material_flat().into_style(),
            ThemeId::PhotoshopStyle => photoshop().into_style(),
            ThemeId::GrayVariations => shades_of_gray(0.0, 1.0, 1.0),
            ThemeId::GrayVariationsDarker => shades_of_gray(0.0, 1.5, 0.5),
            ThemeId::MicrosoftStyle => microsoft().into_style(),
            ThemeId::Cherry => cherry().into_style(),
            ThemeId::Darcula => darcula(1.0, -1.0, 1.0, 1.0, 1.0),
            ThemeId::LightRounded => light_rounded().into_style(),
            ThemeId::SoDarkAccentBlue => so_dark(0.548),
            ThemeId::SoDarkAccentYellow => so_dark(0.140),
            ThemeId::SoDarkAccentRed => so_dark(0.0),
            ThemeId::BlackIsBlack => black_is_black().into_style(),
            ThemeId::WhiteIsWhite => white_is_white().into_style(),
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemeId {
    type Err = ThemeError;

    /// Accepts display names case-insensitively, with or without underscores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ThemeId::ALL
            .into_iter()
            .find(|theme| normalize(theme.name()) == wanted)
            .ok_or_else(|| ThemeError::UnknownTheme(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Dark theme built around one accent hue (`0.0..=1.0`)
pub fn so_dark(hue: f32) -> Style {
    Palette {
        text: Color::gray(0.90),
        text_disabled: Color::gray(0.50),
        window_bg: Color::from_hsv(hue, 0.08, 0.12, 1.0),
        popup_bg: Color::from_hsv(hue, 0.08, 0.10, 0.96),
        border: Color::from_hsv(hue, 0.20, 0.30, 0.60),
        frame_bg: Color::from_hsv(hue, 0.10, 0.20, 1.0),
        title_bg: Color::from_hsv(hue, 0.10, 0.09, 1.0),
        title_bg_active: Color::from_hsv(hue, 0.30, 0.22, 1.0),
        menubar_bg: Color::from_hsv(hue, 0.08, 0.15, 1.0),
        accent: Color::from_hsv(hue, 0.80, 0.60, 1.0),
        accent_strong: Color::from_hsv(hue, 0.80, 0.90, 1.0),
        rounding: 4.0,
        frame_border: 0.0,
    }
    .into_style()
}

/// Pure grays; value multipliers scale the front widgets and backgrounds
pub fn shades_of_gray(rounding: f32, value_multiplier_front: f32, value_multiplier_bg: f32) -> Style {
    let base = Palette {
        text: Color::gray(0.90),
        text_disabled: Color::gray(0.52),
        window_bg: Color::gray(0.20),
        popup_bg: Color::gray(0.18).with_alpha(0.96),
        border: Color::gray(0.40).with_alpha(0.50),
        frame_bg: Color::gray(0.28),
        title_bg: Color::gray(0.16),
        title_bg_active: Color::gray(0.24),
        menubar_bg: Color::gray(0.22),
        accent: Color::gray(0.42),
        accent_strong: Color::gray(0.62),
        rounding,
        frame_border: 0.0,
    }
    .into_style();
    let tweaks = ThemeTweaks {
        value_multiplier_front,
        value_multiplier_bg,
        ..ThemeTweaks::default()
    };
    apply_tweaks(base, &tweaks)
}

/// Darcula palette with the usual tweak knobs (negative hue keeps the blue)
pub fn darcula(
    rounding: f32,
    hue: f32,
    saturation_multiplier: f32,
    value_multiplier_front: f32,
    value_multiplier_bg: f32,
) -> Style {
    let base = Palette {
        text: Color::rgb(0.73, 0.75, 0.74),
        text_disabled: Color::gray(0.35),
        window_bg: Color::rgb(0.24, 0.25, 0.26),
        popup_bg: Color::rgb(0.24, 0.25, 0.26).with_alpha(0.96),
        border: Color::rgb(0.33, 0.33, 0.35),
        frame_bg: Color::rgb(0.17, 0.18, 0.19),
        title_bg: Color::rgb(0.21, 0.22, 0.23),
        title_bg_active: Color::rgb(0.19, 0.20, 0.21),
        menubar_bg: Color::rgb(0.24, 0.25, 0.26),
        accent: Color::rgb(0.29, 0.42, 0.60),
        accent_strong: Color::rgb(0.35, 0.55, 0.82),
        rounding: 0.0,
        frame_border: 1.0,
    }
    .into_style();
    let tweaks = ThemeTweaks {
        rounding,
        hue,
        saturation_multiplier,
        value_multiplier_front,
        value_multiplier_bg,
        ..ThemeTweaks::default()
    };
    apply_tweaks(base, &tweaks)
}

/// The handful of colors every built-in theme is derived from
struct Palette {
    text: Color,
    text_disabled: Color,
    window_bg: Color,
    popup_bg: Color,
    border: Color,
    frame_bg: Color,
    title_bg: Color,
    title_bg_active: Color,
    menubar_bg: Color,
    /// Buttons, headers, hovered frames
    accent: Color,
    /// Active widgets, check marks
    accent_strong: Color,
    rounding: f32,
    frame_border: f32,
}

impl Palette {
    fn into_style(self) -> Style {
        let mut style = Style::default();
        style.set_rounding(self.rounding);
        style.scrollbar_rounding = if self.rounding > 0.0 {
            self.rounding * 4.0
        } else {
            0.0
        };
        style.frame_border_size = self.frame_border;

        let grab = self.window_bg.mix(self.text.with_alpha(1.0), 0.30);
        let slots = [
            (ColorSlot::Text, self.text),
            (ColorSlot::TextDisabled, self.text_disabled),
            (ColorSlot::WindowBg, self.window_bg),
            (ColorSlot::ChildBg, Color::TRANSPARENT),
            (ColorSlot::PopupBg, self.popup_bg),
            (ColorSlot::Border, self.border),
            (ColorSlot::BorderShadow, Color::TRANSPARENT),
            (ColorSlot::FrameBg, self.frame_bg),
            (ColorSlot::FrameBgHovered, self.accent.with_alpha(0.40)),
            (ColorSlot::FrameBgActive, self.accent.with_alpha(0.67)),
            (ColorSlot::TitleBg, self.title_bg),
            (ColorSlot::TitleBgActive, self.title_bg_active),
            (ColorSlot::TitleBgCollapsed, self.title_bg.with_alpha(0.51)),
            (ColorSlot::MenuBarBg, self.menubar_bg),
            (ColorSlot::ScrollbarBg, self.menubar_bg.with_alpha(0.53)),
            (ColorSlot::ScrollbarGrab, grab),
            (ColorSlot::ScrollbarGrabHovered, grab.mix(self.text, 0.15)),
            (ColorSlot::ScrollbarGrabActive, grab.mix(self.text, 0.30)),
            (ColorSlot::CheckMark, self.accent_strong),
            (ColorSlot::SliderGrab, self.accent.with_alpha(0.78)),
            (ColorSlot::SliderGrabActive, self.accent_strong),
            (ColorSlot::Button, self.accent.with_alpha(0.40)),
            (ColorSlot::ButtonHovered, self.accent),
            (ColorSlot::ButtonActive, self.accent_strong),
            (ColorSlot::Header, self.accent.with_alpha(0.31)),
            (ColorSlot::HeaderHovered, self.accent.with_alpha(0.80)),
            (ColorSlot::HeaderActive, self.accent),
            (ColorSlot::Separator, self.border),
            (ColorSlot::ResizeGrip, self.accent.with_alpha(0.20)),
            (ColorSlot::Tab, self.accent.with_alpha(0.46)),
            (ColorSlot::TabHovered, self.accent.with_alpha(0.80)),
            (ColorSlot::TabActive, self.accent_strong.with_alpha(0.86)),
            (ColorSlot::TextSelectedBg, self.accent.with_alpha(0.35)),
            (ColorSlot::ModalWindowDimBg, Color::gray(0.80).with_alpha(0.35)),
        ];
        for (slot, color) in slots {
            style.set_color(slot, color);
        }
        style
    }
}

fn classic() -> Palette {
    Palette {
        text: Color::gray(0.90),
        text_disabled: Color::gray(0.60),
        window_bg: Color::rgba(0.0, 0.0, 0.0, 0.85),
        popup_bg: Color::rgba(0.11, 0.11, 0.14, 0.92),
        border: Color::gray(0.50).with_alpha(0.50),
        frame_bg: Color::gray(0.43).with_alpha(0.39),
        title_bg: Color::rgba(0.27, 0.27, 0.54, 0.83),
        title_bg_active: Color::rgba(0.32, 0.32, 0.63, 0.87),
        menubar_bg: Color::rgba(0.40, 0.40, 0.55, 0.80),
        accent: Color::rgb(0.35, 0.40, 0.61),
        accent_strong: Color::rgb(0.46, 0.54, 0.80),
        rounding: 0.0,
        frame_border: 0.0,
    }
}

fn dark() -> Palette {
    Palette {
        text: Color::WHITE,
        text_disabled: Color::gray(0.50),
        window_bg: Color::gray(0.06).with_alpha(0.94),
        popup_bg: Color::gray(0.08).with_alpha(0.94),
        border: Color::rgba(0.43, 0.43, 0.50, 0.50),
        frame_bg: Color::rgba(0.16, 0.29, 0.48, 0.54),
        title_bg: Color::gray(0.04),
        title_bg_active: Color::rgb(0.16, 0.29, 0.48),
        menubar_bg: Color::gray(0.14),
        accent: Color::rgb(0.26, 0.59, 0.98),
        accent_strong: Color::rgb(0.06, 0.53, 0.98),
        rounding: 0.0,
        frame_border: 0.0,
    }
}

fn light() -> Palette {
    Palette {
        text: Color::BLACK,
        text_disabled: Color::gray(0.60),
        window_bg: Color::gray(0.94),
        popup_bg: Color::WHITE.with_alpha(0.98),
        border: Color::BLACK.with_alpha(0.30),
        frame_bg: Color::WHITE,
        title_bg: Color::gray(0.96),
        title_bg_active: Color::gray(0.82),
        menubar_bg: Color::gray(0.86),
        accent: Color::rgb(0.26, 0.59, 0.98),
        accent_strong: Color::rgb(0.06, 0.53, 0.98),
        rounding: 0.0,
        frame_border: 0.0,
    }
}

fn material_flat() -> Palette {
    Palette {
        text: Color::rgb(0.83, 0.85, 0.87),
        text_disabled: Color::rgb(0.44, 0.47, 0.50),
        window_bg: Color::rgb(0.17, 0.19, 0.21),
        popup_bg: Color::rgb(0.15, 0.17, 0.19).with_alpha(0.98),
        border: Color::gray(0.30),
        frame_bg: Color::rgb(0.25, 0.27, 0.29),
        title_bg: Color::rgb(0.17, 0.19, 0.21),
        title_bg_active: Color::rgb(0.14, 0.16, 0.18),
        menubar_bg: Color::rgb(0.20, 0.22, 0.24),
        accent: Color::rgb(0.12, 0.59, 0.82),
        accent_strong: Color::rgb(0.0, 0.51, 0.76),
        rounding: 0.0,
        frame_border: 0.0,
    }
}

fn photoshop() -> Palette {
    Palette {
        text: Color::gray(0.86),
        text_disabled: Color::gray(0.50),
        window_bg: Color::gray(0.18),
        popup_bg: Color::gray(0.31),
        border: Color::gray(0.27),
        frame_bg: Color::gray(0.16),
        title_bg: Color::gray(0.15),
        title_bg_active: Color::gray(0.15),
        menubar_bg: Color::gray(0.20),
        accent: Color::gray(0.39),
        accent_strong: Color::rgb(1.0, 0.39, 0.0),
        rounding: 2.0,
        frame_border: 1.0,
    }
}

fn microsoft() -> Palette {
    Palette {
        text: Color::gray(0.10),
        text_disabled: Color::gray(0.60),
        window_bg: Color::gray(0.95),
        popup_bg: Color::WHITE,
        border: Color::gray(0.60),
        frame_bg: Color::WHITE,
        title_bg: Color::gray(0.90),
        title_bg_active: Color::gray(0.90),
        menubar_bg: Color::gray(0.90),
        accent: Color::rgb(0.0, 0.47, 0.84),
        accent_strong: Color::rgb(0.0, 0.33, 0.60),
        rounding: 0.0,
        frame_border: 1.0,
    }
}

fn cherry() -> Palette {
    Palette {
        text: Color::rgba(0.86, 0.93, 0.89, 0.78),
        text_disabled: Color::rgba(0.86, 0.93, 0.89, 0.28),
        window_bg: Color::rgb(0.13, 0.14, 0.17),
        popup_bg: Color::rgba(0.20, 0.22, 0.27, 0.90),
        border: Color::rgba(0.54, 0.48, 0.29, 0.16),
        frame_bg: Color::rgb(0.20, 0.22, 0.27),
        title_bg: Color::rgb(0.23, 0.20, 0.27),
        title_bg_active: Color::rgb(0.50, 0.08, 0.26),
        menubar_bg: Color::rgba(0.20, 0.22, 0.27, 0.47),
        accent: Color::rgb(0.46, 0.20, 0.30),
        accent_strong: Color::rgb(0.71, 0.22, 0.27),
        rounding: 3.0,
        frame_border: 0.0,
    }
}

fn light_rounded() -> Palette {
    Palette {
        accent: Color::rgb(0.33, 0.53, 0.80),
        accent_strong: Color::rgb(0.20, 0.42, 0.75),
        rounding: 4.0,
        ..light()
    }
}

fn black_is_black() -> Palette {
    Palette {
        text: Color::gray(0.90),
        text_disabled: Color::gray(0.45),
        window_bg: Color::BLACK,
        popup_bg: Color::gray(0.05),
        border: Color::gray(0.25),
        frame_bg: Color::gray(0.10),
        title_bg: Color::BLACK,
        title_bg_active: Color::gray(0.08),
        menubar_bg: Color::gray(0.05),
        accent: Color::gray(0.25),
        accent_strong: Color::gray(0.55),
        rounding: 0.0,
        frame_border: 0.0,
    }
}

fn white_is_white() -> Palette {
    Palette {
        text: Color::BLACK,
        text_disabled: Color::gray(0.55),
        window_bg: Color::WHITE,
        popup_bg: Color::WHITE,
        border: Color::gray(0.70),
        frame_bg: Color::gray(0.92),
        title_bg: Color::WHITE,
        title_bg_active: Color::gray(0.94),
        menubar_bg: Color::gray(0.96),
        accent: Color::gray(0.78),
        accent_strong: Color::gray(0.40),
        rounding: 0.0,
        frame_border: 0.0,
    }
}
