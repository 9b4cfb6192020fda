//! Palettes and biased color draws

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::color::Color;
use crate::error::{EffectError, EffectResult};

/// Non-empty list of colors, ordered by weight (front = most likely)
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> EffectResult<Self> {
        if colors.is_empty() {
            return Err(EffectError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn from_slice(colors: &[Color]) -> EffectResult<Self> {
        Self::new(colors.to_vec())
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false, palettes are checked on construction
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index drawn as `floor(u^bend * N)`
    ///
    /// A `bend` above one favors the front of the palette.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn biased_index<R: Rng + ?Sized>(&self, rng: &mut R, bend: f32) -> usize {
        let u: f32 = rng.random();
        let index = (libm::powf(u, bend) * self.colors.len() as f32) as usize;
        index.min(self.colors.len() - 1)
    }

    /// Draw a color with the bias exponent `bend`
    pub fn pick_biased<R: Rng + ?Sized>(&self, rng: &mut R, bend: f32) -> Color {
        self.colors[self.biased_index(rng, bend)]
    }

    /// Draw a color uniformly
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors.choose(rng).copied().unwrap_or(Color::BLACK)
    }
}

/// Accept a bias exponent usable with [`Palette::biased_index`]
pub fn validate_bend(bend: f32) -> EffectResult<f32> {
    if bend.is_finite() && bend >= 0.0 {
        Ok(bend)
    } else {
        Err(EffectError::InvalidBend(bend))
    }
}
