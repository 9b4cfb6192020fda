//! Breathing effect
//!
//! Each pixel keeps one palette color and slowly pulses its brightness.

use alloc::vec::Vec;

use rand::Rng;

use super::{Effect, Pacing};
use crate::color::{Color, dim_color};
use crate::error::EffectResult;
use crate::frame::Frame;
use crate::palette::{Palette, validate_bend};
use crate::phase::{CycleSpec, assign_phases};
use crate::random::{EffectRng, default_rng};
use crate::topology::Topology;

const BREATHE_FPS: f32 = 6.0;
const BREATHE_FRAMES: usize = 60;

/// Brightness factor at position `counter` of a `steps` long cycle
///
/// The envelope is darkest in the middle of the cycle and symmetric around
/// it. `light_span` is the share of the lightness range that is used.
#[allow(clippy::cast_precision_loss)]
pub fn breath_factor(counter: usize, steps: usize, light_span: f32) -> f32 {
    let mid = (steps as f32 - 1.0) / 2.0;
    let prop = if mid > 0.0 {
        libm::fabsf(counter as f32 - mid) / mid
    } else {
        1.0
    };
    let span = 1.0 - libm::sqrtf(1.0 - light_span.clamp(0.0, 1.0));
    let level = prop * span + 1.0 - span;
    level * level
}

/// Breathe generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BreatheConfig {
    pub palette: Palette,
    pub bend: f32,
    /// Share of the lightness range the envelope sweeps, 0.0 - 1.0
    pub light_span: f32,
    pub cycle: CycleSpec,
    pub fps: Option<f32>,
}

impl BreatheConfig {
    pub fn new(colors: &[Color], bend: f32, light_span: f32, cycle: CycleSpec) -> EffectResult<Self> {
        Ok(Self {
            palette: Palette::from_slice(colors)?,
            bend: validate_bend(bend)?,
            light_span,
            cycle: cycle.validate()?,
            fps: None,
        })
    }

    /// Breathing over a user supplied palette
    pub fn from_palette(colors: &[Color]) -> EffectResult<Self> {
        Self::new(colors, 1.0, 0.75, CycleSpec::range(12, 30))
    }

    #[must_use]
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = Some(fps);
        self
    }
}

#[derive(Debug, Clone)]
struct Breathbit {
    color: Color,
    counter: usize,
    steps: usize,
}

impl Breathbit {
    fn next(&mut self, light_span: f32) -> Color {
        self.counter += 1;
        if self.counter >= self.steps {
            self.counter = 0;
        }
        dim_color(self.color, breath_factor(self.counter, self.steps, light_span))
    }
}

/// Fixed color per pixel with a periodic brightness envelope
#[derive(Debug, Clone)]
pub struct BreatheEffect<R: Rng = EffectRng> {
    topology: Topology,
    config: BreatheConfig,
    rng: R,
    bits: Vec<Breathbit>,
}

impl BreatheEffect {
    pub fn new(topology: &Topology, config: BreatheConfig) -> EffectResult<Self> {
        Self::with_rng(topology, config, default_rng())
    }
}

impl<R: Rng> BreatheEffect<R> {
    pub fn with_rng(topology: &Topology, config: BreatheConfig, rng: R) -> EffectResult<Self> {
        let mut effect = Self {
            topology: topology.clone(),
            config: BreatheConfig {
                bend: validate_bend(config.bend)?,
                cycle: config.cycle.validate()?,
                ..config
            },
            rng,
            bits: Vec::new(),
        };
        effect.reset(0)?;
        Ok(effect)
    }
}

impl<R: Rng> Effect for BreatheEffect<R> {
    fn reset(&mut self, loop_len: usize) -> EffectResult<()> {
        let phases = assign_phases(self.config.cycle, loop_len, self.topology.num_leds());
        self.bits = phases
            .into_iter()
            .map(|phase| Breathbit {
                color: self.config.palette.pick_biased(&mut self.rng, self.config.bend),
                // Incremented before use, a zero offset starts at counter zero
                counter: if phase.offset > 0 {
                    phase.offset
                } else {
                    phase.period
                },
                steps: phase.period,
            })
            .collect();
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        let light_span = self.config.light_span;
        let bits = &mut self.bits;
        self.topology.make_from_fn(
            |i| {
                bits.get_mut(i)
                    .map(|bit| bit.next(light_span))
                    .unwrap_or(Color::BLACK)
            },
            false,
        )
    }

    fn pacing(&self) -> Pacing {
        Pacing::new(BREATHE_FPS, BREATHE_FRAMES).with_fps(self.config.fps)
    }
}
