//! Glint Themes
//!
//! Sixteen built-in themes and a small set of tweaks (rounding, hue,
//! saturation, value and alpha multipliers) resolved into an immutable
//! [`Style`] snapshot by the pure function [`style_for`].
//!
//! # Example
//!
//! ```
//! use glint_theme::{style_for, ColorSlot, ThemeId, ThemeTweaks};
//!
//! let tweaks = ThemeTweaks { rounding: 4.0, ..ThemeTweaks::default() };
//! let style = style_for(ThemeId::Cherry, &tweaks);
//! assert_eq!(style.frame_rounding, 4.0);
//! assert!(style.color(ColorSlot::Text).a > 0.0);
//! ```

mod color;
mod error;
mod style;
mod themes;
mod tweaks;

pub use color::Color;
pub use error::ThemeError;
pub use style::{ColorSlot, Style};
pub use themes::{darcula, shades_of_gray, so_dark, ThemeId};
pub use tweaks::{apply_tweaks, style_for, ThemeTweaks, TweakedTheme};
