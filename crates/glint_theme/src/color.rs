//! Linear RGBA color with HSV conversion

use serde::{Deserialize, Serialize};

/// RGBA color, components in `0.0..=1.0`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// From `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Linear interpolation, alpha included
    pub fn mix(self, other: Color, t: f32) -> Self {
        Self::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Hue, saturation and value, each in `0.0..=1.0`
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        let mut k = 0.0f32;
        if g < b {
            std::mem::swap(&mut g, &mut b);
            k = -1.0;
        }
        if r < g {
            std::mem::swap(&mut r, &mut g);
            k = -2.0 / 6.0 - k;
        }
        let chroma = r - g.min(b);
        let h = (k + (g - b) / (6.0 * chroma + 1e-20)).abs();
        let s = chroma / (r + 1e-20);
        (h, s, r)
    }

    pub fn from_hsv(h: f32, s: f32, v: f32, a: f32) -> Self {
        if s == 0.0 {
            return Self::rgba(v, v, v, a);
        }
        let h = (h % 1.0) * 6.0;
        let sector = h as i32;
        let f = h - sector as f32;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Color, b: Color) -> bool {
        (a.r - b.r).abs() < 1e-4
            && (a.g - b.g).abs() < 1e-4
            && (a.b - b.b).abs() < 1e-4
            && (a.a - b.a).abs() < 1e-4
    }

    #[test]
    fn test_hsv_primaries() {
        let (h, s, v) = Color::rgb(1.0, 0.0, 0.0).to_hsv();
        assert!(h.abs() < 1e-6 && (s - 1.0).abs() < 1e-6 && (v - 1.0).abs() < 1e-6);

        let (h, _, _) = Color::rgb(0.0, 1.0, 0.0).to_hsv();
        assert!((h - 1.0 / 3.0).abs() < 1e-5);

        let (h, _, _) = Color::rgb(0.0, 0.0, 1.0).to_hsv();
        assert!((h - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_hsv_round_trip() {
        for color in [
            Color::rgb(0.26, 0.59, 0.98),
            Color::rgba(0.71, 0.22, 0.27, 0.5),
            Color::rgb(0.1, 0.8, 0.3),
        ] {
            let (h, s, v) = color.to_hsv();
            assert!(close(Color::from_hsv(h, s, v, color.a), color));
        }
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let (_, s, v) = Color::gray(0.4).to_hsv();
        assert_eq!(s, 0.0);
        assert!((v - 0.4).abs() < 1e-6);
        assert_eq!(Color::from_hsv(0.7, 0.0, 0.4, 1.0), Color::gray(0.4));
    }

    #[test]
    fn test_hex_and_rgba8() {
        assert_eq!(Color::from_hex(0xFF8000).to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(Color::rgba(2.0, -1.0, 0.5, 1.0).to_rgba8(), [255, 0, 128, 255]);
    }
}
