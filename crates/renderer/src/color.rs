//! Color value type and interpolation.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }
}

/// Linear color interpolation; `t` is clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f64 * t_inv) + (color2.r as f64 * t)) as u8,
        ((color1.g as f64 * t_inv) + (color2.g as f64 * t)) as u8,
        ((color1.b as f64 * t_inv) + (color2.b as f64 * t)) as u8,
        ((color1.a as f64 * t_inv) + (color2.a as f64 * t)) as u8,
    )
}
