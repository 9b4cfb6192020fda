//! Built-in sparkle strategy: a color draw combined with a brightness
//! envelope

use alloc::vec::Vec;

use rand::Rng;
use rand::distr::weighted::WeightedIndex;

use super::{SparkleStep, SparkleStrategy};
use crate::color::{Color, blend_colors, wrap_unit};
use crate::error::{EffectError, EffectResult};
use crate::palette::Palette;

/// How one channel of a random color is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    /// Uniform over the whole channel range
    Any,
    Fixed(f32),
    /// Uniform in `lo..hi`
    Range(f32, f32),
}

impl Channel {
    fn draw<R: Rng + ?Sized>(self, rng: &mut R, lo: f32, hi: f32) -> f32 {
        let (from, to) = match self {
            Self::Fixed(value) => return value,
            Self::Any => (lo, hi),
            Self::Range(from, to) => (from, to),
        };
        from + (to - from) * rng.random::<f32>()
    }
}

/// Color given to a sparkle when it is born
#[derive(Debug, Clone, PartialEq)]
pub enum SparkleColor {
    /// Independently drawn channels
    Random {
        hue: Channel,
        sat: Channel,
        light: Channel,
    },
    /// Fully saturated hue sweeping the wheel once per `cycle` frames,
    /// optionally displaced by a weighted choice of hue offsets
    Circular {
        cycle: usize,
        offsets: Vec<f32>,
        weights: Option<WeightedIndex<f32>>,
        light: f32,
    },
    /// Whites tinted toward one of two hues
    TintedWhite {
        hue1: f32,
        depth1: f32,
        hue2: f32,
        depth2: f32,
    },
    /// One of a fixed list of colors
    Selected {
        palette: Palette,
        weights: Option<WeightedIndex<f32>>,
    },
    Fixed(Color),
}

impl SparkleColor {
    pub const fn random(hue: Channel, sat: Channel, light: Channel) -> Self {
        Self::Random { hue, sat, light }
    }

    /// Hue sweep without offsets
    pub const fn circular(cycle: usize) -> Self {
        Self::Circular {
            cycle,
            offsets: Vec::new(),
            weights: None,
            light: 0.0,
        }
    }

    /// Hue sweep displaced by `offsets`, drawn with the matching `weights`
    pub fn circular_with_offsets(
        cycle: usize,
        offsets: &[f32],
        weights: &[f32],
        light: f32,
    ) -> EffectResult<Self> {
        if cycle == 0 {
            return Err(EffectError::InvalidCycle { lo: 0, hi: 0 });
        }
        let weights = if offsets.is_empty() {
            None
        } else {
            Some(weighted_index(weights, offsets.len())?)
        };
        Ok(Self::Circular {
            cycle,
            offsets: offsets.to_vec(),
            weights,
            light,
        })
    }

    pub const fn tinted_white(hue1: f32, depth1: f32, hue2: f32, depth2: f32) -> Self {
        Self::TintedWhite {
            hue1,
            depth1,
            hue2,
            depth2,
        }
    }

    /// Uniform or weighted choice from `colors`
    pub fn selected(colors: &[Color], weights: Option<&[f32]>) -> EffectResult<Self> {
        Ok(Self::Selected {
            palette: Palette::from_slice(colors)?,
            weights: weights
                .map(|weights| weighted_index(weights, colors.len()))
                .transpose()?,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw<R: Rng + ?Sized>(&self, time: usize, rng: &mut R) -> Color {
        match self {
            Self::Random { hue, sat, light } => Color::hsl(
                hue.draw(rng, 0.0, 1.0),
                sat.draw(rng, 0.0, 1.0),
                light.draw(rng, -1.0, 1.0),
            ),
            Self::Circular {
                cycle,
                offsets,
                weights,
                light,
            } => {
                let offset = weights
                    .as_ref()
                    .and_then(|weights| offsets.get(rng.sample(weights)))
                    .copied()
                    .unwrap_or(0.0);
                let cycle = (*cycle).max(1);
                let sweep = (time % cycle) as f32 / cycle as f32;
                Color::hsl(wrap_unit(sweep + offset), 1.0, *light)
            }
            Self::TintedWhite {
                hue1,
                depth1,
                hue2,
                depth2,
            } => {
                let scale = depth1 + depth2;
                let mid = if scale > 0.0 { depth1 / scale } else { 0.5 };
                let r: f32 = rng.random();
                let hue = if r < mid { *hue1 } else { *hue2 };
                Color::hsl(hue, 1.0, 1.0 - scale * libm::fabsf(r - mid))
            }
            Self::Selected { palette, weights } => match weights {
                Some(weights) => palette
                    .colors()
                    .get(rng.sample(weights))
                    .copied()
                    .unwrap_or(Color::BLACK),
                None => palette.pick(rng),
            },
            Self::Fixed(color) => *color,
        }
    }
}

fn weighted_index(weights: &[f32], expected: usize) -> EffectResult<WeightedIndex<f32>> {
    if weights.len() != expected {
        return Err(EffectError::MismatchedWeights { expected });
    }
    WeightedIndex::new(weights).map_err(|_| EffectError::MismatchedWeights { expected })
}

/// Brightness curve a sparkle follows over its lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SparkleEnvelope {
    /// Fade in from `base` over `up` frames, hold, fade out over `down`
    Pulse {
        up: usize,
        stable: usize,
        down: usize,
        base: Color,
        linear: bool,
    },
    /// Single `flash` frame, hold, fade out to `base`
    Flash {
        stable: usize,
        down: usize,
        flash: Color,
        base: Color,
        linear: bool,
    },
    /// Lightness sweep from black up to white and back, with the saturation
    /// scaled by `sat_up` and `sat_down` on either side
    Loop {
        up: usize,
        down: usize,
        sat_up: f32,
        sat_down: f32,
        linear: bool,
    },
}

impl SparkleEnvelope {
    pub const fn pulse(up: usize, stable: usize, down: usize) -> Self {
        Self::Pulse {
            up,
            stable,
            down,
            base: Color::BLACK,
            linear: false,
        }
    }

    pub const fn flash(stable: usize, down: usize) -> Self {
        Self::Flash {
            stable,
            down,
            flash: Color::WHITE,
            base: Color::BLACK,
            linear: false,
        }
    }

    pub const fn looping(up: usize, down: usize) -> Self {
        Self::Loop {
            up,
            down,
            sat_up: 1.0,
            sat_down: 0.0,
            linear: false,
        }
    }

    /// Number of frames until the sparkle completes
    pub const fn lifetime(&self) -> usize {
        match *self {
            Self::Pulse {
                up, stable, down, ..
            } => up + stable + down,
            Self::Flash { stable, down, .. } => 1 + stable + down,
            Self::Loop { up, down, .. } => up + down,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn at(&self, elapsed: usize, color: Color) -> SparkleStep {
        let total = self.lifetime();
        if elapsed >= total {
            return SparkleStep::Completed;
        }
        let remaining = (total - elapsed) as f32;
        let color = match *self {
            Self::Pulse {
                up,
                stable,
                down,
                base,
                linear,
            } => {
                if elapsed < up {
                    let progress = (elapsed as f32 + 1.0) / (up as f32 + 1.0);
                    blend_colors(base, color, shape(progress, linear))
                } else if elapsed < up + stable {
                    color
                } else {
                    blend_colors(base, color, shape(remaining / (down as f32 + 1.0), linear))
                }
            }
            Self::Flash {
                stable,
                down,
                flash,
                base,
                linear,
            } => {
                if elapsed < 1 {
                    flash
                } else if elapsed < 1 + stable {
                    color
                } else {
                    blend_colors(base, color, shape(remaining / (down as f32 + 1.0), linear))
                }
            }
            Self::Loop {
                up,
                down,
                sat_up,
                sat_down,
                linear,
            } => {
                let (progress, sat_scale) = if elapsed < up {
                    ((elapsed as f32 + 1.0) / up as f32, sat_up)
                } else {
                    (remaining / down as f32, sat_down)
                };
                let level = shape(progress, linear);
                Color::hsl(color.hue, color.sat * sat_scale, 2.0 * level - 1.0)
            }
        };
        SparkleStep::Continuing(color)
    }
}

fn shape(progress: f32, linear: bool) -> f32 {
    if linear { progress } else { progress * progress }
}

/// Color draw plus envelope, the strategy behind every sparkle preset
#[derive(Debug, Clone, PartialEq)]
pub struct SparkleProfile {
    pub color: SparkleColor,
    pub envelope: SparkleEnvelope,
}

impl SparkleProfile {
    pub const fn new(color: SparkleColor, envelope: SparkleEnvelope) -> Self {
        Self { color, envelope }
    }
}

impl SparkleStrategy for SparkleProfile {
    type Descriptor = Color;

    fn create<R: Rng + ?Sized>(&self, _index: usize, time: usize, rng: &mut R) -> Color {
        self.color.draw(time, rng)
    }

    fn advance(&self, _index: usize, elapsed: usize, descriptor: &Color) -> SparkleStep {
        self.envelope.at(elapsed, *descriptor)
    }
}
