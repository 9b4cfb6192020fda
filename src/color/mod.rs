//! HSL-like color model used by every generator
//!
//! Hue is cyclic in `[0, 1)`, saturation lives in `[0, 1]` and lightness in
//! `[-1, 1]`, where `-1` is black, `0` is the plain hue and `1` is white.

mod convert;
mod utils;

use smart_leds::RGB8;
pub use utils::{blend_colors, dim_color, wrap_unit};

pub type Rgb = RGB8;

/// A single pixel color
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub hue: f32,
    pub sat: f32,
    pub light: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, -1.0);
    pub const WHITE: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a color from raw channels without normalization
    pub const fn new(hue: f32, sat: f32, light: f32) -> Self {
        Self { hue, sat, light }
    }

    /// Create a color, wrapping the hue and clamping the other channels
    pub fn hsl(hue: f32, sat: f32, light: f32) -> Self {
        Self {
            hue: wrap_unit(hue),
            sat: sat.clamp(0.0, 1.0),
            light: light.clamp(-1.0, 1.0),
        }
    }

    /// Channels as a `(hue, sat, light)` tuple
    pub const fn as_hsl(self) -> (f32, f32, f32) {
        (self.hue, self.sat, self.light)
    }

    /// Returns if the hue of this color carries no visible information
    pub fn is_achromatic(self) -> bool {
        self.sat <= 0.0 || self.light <= -1.0 || self.light >= 1.0
    }

    /// Same color with the hue turned half way around the wheel
    #[must_use]
    pub fn complement(self) -> Self {
        Self {
            hue: wrap_unit(self.hue + 0.5),
            ..self
        }
    }
}

/// Create a palette from a list of `(hue, sat, light)` triples
#[macro_export]
macro_rules! hsl_palette {
    ($(($h:expr, $s:expr, $l:expr)),* $(,)?) => {
        [
            $($crate::color::Color::new($h, $s, $l)),*
        ]
    };
}
