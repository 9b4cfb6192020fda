use core::f32::consts::TAU;

use super::{Color, Rgb, wrap_unit};

// Saturation 0 at lightness 0 renders as mid grey
const GREY: f32 = 0.5;

// Hue 0 is blue, rising through green and yellow toward red
const HUE_ORIGIN: f32 = 2.0 / 3.0;

impl Color {
    /// Convert to an 8-bit device color
    pub fn to_rgb(self) -> Rgb {
        let (r, g, b) = wheel(wrap_unit(HUE_ORIGIN - self.hue));
        let sat = self.sat.clamp(0.0, 1.0);
        let light = self.light.clamp(-1.0, 1.0);

        let channel = |pure: f32| {
            let mixed = GREY + (pure - GREY) * sat;
            let shaded = if light < 0.0 {
                mixed * (1.0 + light)
            } else {
                mixed + (1.0 - mixed) * light
            };
            to_u8(shaded)
        };

        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// Position in the color cylinder: chroma plane in x/y, lightness in z
    pub fn to_point(self) -> [f32; 3] {
        let angle = self.hue * TAU;
        [
            self.sat * libm::cosf(angle),
            self.sat * libm::sinf(angle),
            self.light,
        ]
    }

    /// Inverse of [`Color::to_point`], clamping points outside the cylinder
    pub fn from_point(point: [f32; 3]) -> Self {
        let [x, y, z] = point;
        let radius = libm::sqrtf(x * x + y * y);
        let hue = if radius > 0.0 {
            wrap_unit(libm::atan2f(y, x) / TAU)
        } else {
            0.0
        };
        Self::hsl(hue, radius, z)
    }
}

/// Fully saturated color for a standard hue in `[0, 1)`
fn wheel(hue: f32) -> (f32, f32, f32) {
    let sector = hue * 6.0;
    let index = libm::floorf(sector);
    let f = sector - index;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    match (index as u8) % 6 {
        0 => (1.0, f, 0.0),
        1 => (1.0 - f, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, 1.0 - f, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - f),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: f32) -> u8 {
    libm::roundf(value.clamp(0.0, 1.0) * 255.0) as u8
}
