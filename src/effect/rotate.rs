//! Rotating pattern effect
//!
//! A static base frame is rotated around the ring, so every pixel passes
//! through the whole pattern. With a scrambling permutation on top every
//! pixel runs through the pattern quickly while the string as a whole keeps
//! looking the same.

use alloc::vec::Vec;

use rand::Rng;

use super::{Effect, Pacing};
use crate::color::Color;
use crate::error::{EffectError, EffectResult};
use crate::frame::Frame;
use crate::topology::Topology;

const ROTATE_FPS: f32 = 20.0;
const WHITES_LIGHTNESS: f32 = 0.7;
const WHITES_STEP: usize = 5;

/// Built-in rotating patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateVariant {
    /// Full hue wheel around the ring
    Spectrum,
    /// Hue wheel with the pixels shuffled
    ScatteredSpectrum,
    /// Shuffled pale hues, rotating five pixels per frame
    RotatingWhites,
}

impl RotateVariant {
    pub fn config<R: Rng + ?Sized>(self, topology: &Topology, rng: &mut R) -> RotateConfig {
        match self {
            Self::Spectrum => RotateConfig::new(spectrum(topology, 0.0)),
            Self::ScatteredSpectrum => RotateConfig::new(spectrum(topology, 0.0))
                .with_permutation(topology.random_permutation(rng)),
            Self::RotatingWhites => RotateConfig::new(spectrum(topology, WHITES_LIGHTNESS))
                .with_permutation(topology.random_permutation(rng))
                .with_step(WHITES_STEP),
        }
    }
}

/// The hue wheel laid out once around the ring
#[allow(clippy::cast_precision_loss)]
pub fn spectrum(topology: &Topology, light: f32) -> Frame {
    let num_leds = topology.num_leds().max(1) as f32;
    topology.make_from_fn(|i| Color::hsl(i as f32 / num_leds, 1.0, light), true)
}

/// Rotate generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RotateConfig {
    pub base: Frame,
    /// Emitted pixel `i` shows rotated pixel `permutation[i]`
    pub permutation: Option<Vec<usize>>,
    /// Pixels moved per frame
    pub step: usize,
    pub fps: Option<f32>,
}

impl RotateConfig {
    pub const fn new(base: Frame) -> Self {
        Self {
            base,
            permutation: None,
            step: 1,
            fps: None,
        }
    }

    #[must_use]
    pub fn with_permutation(mut self, permutation: Vec<usize>) -> Self {
        self.permutation = Some(permutation);
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = Some(fps);
        self
    }
}

/// Base frame rotating around the ring
#[derive(Debug, Clone)]
pub struct RotateEffect {
    topology: Topology,
    config: RotateConfig,
    pattern: Frame,
}

impl RotateEffect {
    pub fn new(topology: &Topology, config: RotateConfig) -> EffectResult<Self> {
        if config.step == 0 {
            return Err(EffectError::InvalidStep);
        }
        if let Some(permutation) = &config.permutation {
            topology.validate_permutation(permutation)?;
        }
        let base = topology.make_from_fn(
            |i| config.base.get(i).copied().unwrap_or(Color::BLACK),
            false,
        );

        Ok(Self {
            topology: topology.clone(),
            pattern: base.clone(),
            config: RotateConfig { base, ..config },
        })
    }
}

impl Effect for RotateEffect {
    fn reset(&mut self, _loop_len: usize) -> EffectResult<()> {
        self.pattern = self.topology.copy(&self.config.base);
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        let current = match &self.config.permutation {
            Some(permutation) => self.topology.permute(&self.pattern, permutation, true),
            None => self.pattern.clone(),
        };
        #[allow(clippy::cast_possible_wrap)]
        let step = self.config.step as isize;
        self.pattern = self.topology.rotate(&self.pattern, step, true);
        current
    }

    fn pacing(&self) -> Pacing {
        let frame_count = (self.topology.num_leds() / self.config.step).max(1);
        Pacing::new(ROTATE_FPS, frame_count).with_fps(self.config.fps)
    }
}
