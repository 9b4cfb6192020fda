//! Glitter effect
//!
//! Bright single-frame flashes against a solid background. The presets try
//! to mimic the luster of metallic LEDs.

use rand::Rng;

use super::{Effect, Pacing};
use crate::color::Color;
use crate::error::{EffectError, EffectResult};
use crate::frame::Frame;
use crate::palette::Palette;
use crate::random::{Arrivals, EffectRng, default_rng};
use crate::topology::Topology;

const GLITTER_FPS: f32 = 10.0;
const GLITTER_FRAMES: usize = 100;
const GLITTER_FREQUENCY: f64 = 10.0;
// Flash lightness added to a single color palette
const FLASH_LIFT: f32 = 0.5;

/// Built-in metallic looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlitterVariant {
    Silver,
    Gold,
    RoseGold,
    Bronze,
    StainlessSteel,
}

impl GlitterVariant {
    pub fn config(self) -> EffectResult<GlitterConfig> {
        let (flash, background) = match self {
            Self::Silver => (Color::new(0.0, 1.0, 0.8), Color::new(0.0, 1.0, 0.3)),
            Self::Gold => (Color::new(0.45, 1.0, 0.5), Color::new(0.45, 1.0, -0.1)),
            Self::RoseGold => (Color::new(0.53, 1.0, 0.6), Color::new(0.53, 1.0, 0.1)),
            Self::Bronze => (Color::new(0.58, 1.0, 0.4), Color::new(0.58, 1.0, -0.4)),
            Self::StainlessSteel => (Color::new(0.0, 0.0, 1.0), Color::new(0.0, 0.0, 0.0)),
        };
        GlitterConfig::new(&[flash], GLITTER_FREQUENCY, background)
    }
}

/// Glitter generator configuration
#[derive(Debug, Clone)]
pub struct GlitterConfig {
    /// Colors of the flashes
    pub palette: Palette,
    /// Expected flashes per frame
    pub arrivals: Arrivals,
    pub background: Color,
}

impl GlitterConfig {
    pub fn new(flashes: &[Color], frequency: f64, background: Color) -> EffectResult<Self> {
        Ok(Self {
            palette: Palette::from_slice(flashes)?,
            arrivals: Arrivals::new(frequency)?,
            background,
        })
    }

    /// Glitter from a user palette
    ///
    /// The first color is the background, the rest flash. A single color
    /// flashes a lighter version of itself.
    pub fn from_palette(colors: &[Color]) -> EffectResult<Self> {
        match colors {
            [] => Err(EffectError::EmptyPalette),
            [background] => {
                let flash = Color {
                    light: (background.light + FLASH_LIFT).min(1.0),
                    ..*background
                };
                Self::new(&[flash], GLITTER_FREQUENCY, *background)
            }
            [background, flashes @ ..] => Self::new(flashes, GLITTER_FREQUENCY, *background),
        }
    }
}

/// Instantaneous random flashes over a solid background
#[derive(Debug, Clone)]
pub struct GlitterEffect<R: Rng = EffectRng> {
    topology: Topology,
    config: GlitterConfig,
    rng: R,
    background: Frame,
}

impl GlitterEffect {
    pub fn new(topology: &Topology, config: GlitterConfig) -> Self {
        Self::with_rng(topology, config, default_rng())
    }
}

impl<R: Rng> GlitterEffect<R> {
    pub fn with_rng(topology: &Topology, config: GlitterConfig, rng: R) -> Self {
        Self {
            background: topology.make_solid(config.background),
            topology: topology.clone(),
            config,
            rng,
        }
    }
}

impl<R: Rng> Effect for GlitterEffect<R> {
    fn reset(&mut self, _loop_len: usize) -> EffectResult<()> {
        self.background = self.topology.make_solid(self.config.background);
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        self.topology.sprinkle(
            &self.background,
            &self.config.palette,
            &self.config.arrivals,
            &mut self.rng,
        )
    }

    fn pacing(&self) -> Pacing {
        Pacing::new(GLITTER_FPS, GLITTER_FRAMES)
    }
}
