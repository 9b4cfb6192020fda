use super::Color;

/// Wrap a value into `[0, 1)`
#[inline]
pub fn wrap_unit(value: f32) -> f32 {
    let wrapped = value - libm::floorf(value);
    // floorf can leave exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Blend two colors
///
/// Saturation and lightness are interpolated linearly, the hue takes the
/// shortest way around the wheel. When one side is black, white or grey its
/// hue is borrowed from the other side, so fading in from black keeps a
/// constant hue.
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0.0 = all a, 1.0 = all b)
pub fn blend_colors(a: Color, b: Color, amount_of_b: f32) -> Color {
    if amount_of_b <= 0.0 {
        return a;
    }
    if amount_of_b >= 1.0 {
        return b;
    }

    let (from_hue, to_hue) = match (a.is_achromatic(), b.is_achromatic()) {
        (true, false) => (b.hue, b.hue),
        (false, true) => (a.hue, a.hue),
        _ => (a.hue, b.hue),
    };
    let mut delta = to_hue - from_hue;
    if delta > 0.5 {
        delta -= 1.0;
    } else if delta < -0.5 {
        delta += 1.0;
    }

    Color {
        hue: wrap_unit(from_hue + delta * amount_of_b),
        sat: a.sat + (b.sat - a.sat) * amount_of_b,
        light: a.light + (b.light - a.light) * amount_of_b,
    }
}

/// Scale the lightness of a color toward black
///
/// `factor` 1.0 keeps the color, 0.0 gives black.
pub fn dim_color(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);
    Color {
        light: -1.0 + (color.light + 1.0) * factor,
        ..color
    }
}
