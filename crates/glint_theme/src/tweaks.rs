//! Theme tweaks
//!
//! Every field is independently optional: a negative value means "leave the
//! theme's value alone". Tweaks are applied in a fixed order: rounding, hue,
//! saturation, value multipliers, alpha.

use crate::color::Color;
use crate::style::Style;
use crate::themes::ThemeId;
use serde::{Deserialize, Serialize};

/// Adjustments layered on top of a theme's baseline style
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTweaks {
    /// Common rounding for widgets
    pub rounding: f32,
    /// Scrollbar rounding relative to `rounding`; only used when `rounding > 0`
    pub rounding_scrollbar_ratio: f32,
    /// Multiplies the alpha of windows, popups and bars
    pub alpha_multiplier: f32,
    /// Replaces the hue of every color (grays stay gray)
    pub hue: f32,
    /// Multiplies the saturation of every color
    pub saturation_multiplier: f32,
    /// Multiplies the value of front widgets
    pub value_multiplier_front: f32,
    /// Multiplies the value of backgrounds
    pub value_multiplier_bg: f32,
}

impl Default for ThemeTweaks {
    fn default() -> Self {
        Self {
            rounding: -1.0,
            rounding_scrollbar_ratio: 4.0,
            alpha_multiplier: -1.0,
            hue: -1.0,
            saturation_multiplier: -1.0,
            value_multiplier_front: -1.0,
            value_multiplier_bg: -1.0,
        }
    }
}

impl ThemeTweaks {
    /// Whether applying these tweaks leaves every style unchanged
    pub fn is_noop(&self) -> bool {
        self.rounding < 0.0
            && self.alpha_multiplier < 0.0
            && self.hue < 0.0
            && self.saturation_multiplier < 0.0
            && self.value_multiplier_front < 0.0
            && self.value_multiplier_bg < 0.0
    }

    fn touches_hsv(&self) -> bool {
        self.hue >= 0.0
            || self.saturation_multiplier >= 0.0
            || self.value_multiplier_front >= 0.0
            || self.value_multiplier_bg >= 0.0
    }
}

/// A theme plus its tweaks; the unit that gets persisted in settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweakedTheme {
    pub theme: ThemeId,
    pub tweaks: ThemeTweaks,
}

impl TweakedTheme {
    pub fn new(theme: ThemeId) -> Self {
        Self {
            theme,
            tweaks: ThemeTweaks::default(),
        }
    }

    pub fn style(&self) -> Style {
        style_for(self.theme, &self.tweaks)
    }
}

/// Resolve a theme and tweaks into a style snapshot
///
/// Pure: identical arguments give bit-identical results.
pub fn style_for(theme: ThemeId, tweaks: &ThemeTweaks) -> Style {
    apply_tweaks(theme.style(), tweaks)
}

/// Apply tweaks to an existing style
pub fn apply_tweaks(mut style: Style, tweaks: &ThemeTweaks) -> Style {
    if tweaks.rounding >= 0.0 {
        style.set_rounding(tweaks.rounding);
        style.scrollbar_rounding = if tweaks.rounding > 0.0 {
            tweaks.rounding * tweaks.rounding_scrollbar_ratio
        } else {
            0.0
        };
    }

    if tweaks.touches_hsv() {
        style.map_colors(|slot, color| {
            let (mut h, mut s, mut v) = color.to_hsv();
            if tweaks.hue >= 0.0 {
                h = tweaks.hue;
            }
            if tweaks.saturation_multiplier >= 0.0 {
                s = (s * tweaks.saturation_multiplier).min(1.0);
            }
            if !slot.is_text() {
                let multiplier = if slot.is_background() {
                    tweaks.value_multiplier_bg
                } else {
                    tweaks.value_multiplier_front
                };
                if multiplier >= 0.0 {
                    v = (v * multiplier).min(1.0);
                }
            }
            Color::from_hsv(h, s, v, color.a)
        });
    }

    if tweaks.alpha_multiplier >= 0.0 {
        style.map_colors(|slot, color| {
            if slot.is_background() {
                color.with_alpha((color.a * tweaks.alpha_multiplier).min(1.0))
            } else {
                color
            }
        });
    }

    style
}
