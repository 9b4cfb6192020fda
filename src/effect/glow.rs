//! Glowing effect
//!
//! Every pixel drifts between palette colors along straight blends, each
//! segment lasting the pixel's own period. With a finite loop the last two
//! segments steer back to the two colors the pixel started with and the
//! palette draws of the first pass are replayed afterwards, so the output
//! repeats exactly every `loop_len` frames.

use alloc::vec::Vec;

use rand::Rng;

use super::{Effect, Pacing};
use crate::color::{Color, blend_colors};
use crate::error::EffectResult;
use crate::frame::Frame;
use crate::hsl_palette;
use crate::palette::{Palette, validate_bend};
use crate::phase::{CycleSpec, PhaseAssignment, assign_phases};
use crate::random::{EffectRng, default_rng};
use crate::topology::Topology;

const CHARCOAL_PALETTE: [Color; 7] = hsl_palette![
    (0.6057, 1.0, -0.99),
    (0.6171, 1.0, -0.8865),
    (0.6254, 1.0, -0.8083),
    (0.5796, 1.0, -0.7257),
    (0.6222, 1.0, -0.6779),
    (0.5606, 1.0, -0.6080),
    (0.5956, 1.0, -0.4838),
];

const FIRE_PALETTE: [Color; 8] = hsl_palette![
    (0.5689, 1.0, -0.2847),
    (0.5413, 1.0, -0.1809),
    (0.5119, 1.0, -0.0685),
    (0.6185, 1.0, -0.4416),
    (0.6206, 1.0, -0.6780),
    (0.5068, 1.0, 0.1797),
    (0.5603, 1.0, -0.0170),
    (0.45, 1.0, 0.1),
];

const WATER_PALETTE: [Color; 8] = hsl_palette![
    (0.0, 1.0, -0.2),
    (0.0, 1.0, -0.5),
    (0.05, 1.0, -0.3),
    (0.05, 1.0, 0.0),
    (0.1, 1.0, -0.5),
    (0.1, 1.0, 0.0),
    (0.15, 1.0, 0.0),
    (0.0, 1.0, 0.8),
];

const MEADOW_PALETTE: [Color; 9] = hsl_palette![
    (0.2427, 1.0, -0.6294),
    (0.2556, 1.0, -0.3245),
    (0.2692, 1.0, -0.0834),
    (0.2456, 1.0, 0.0243),
    (0.2901, 1.0, 0.2506),
    (0.400, 1.0, 0.4219),
    (0.6065, 1.0, -0.1989),
    (0.7709, 1.0, -0.3420),
    (0.7833, 0.1259, 0.1001),
];

const AURORA_PALETTE: [Color; 10] = hsl_palette![
    (0.0, 0.0, -0.8),
    (0.0, 0.0, -0.5),
    (0.0, 0.0, 0.0),
    (0.7401, 0.3679, 0.1246),
    (0.2744, 0.3180, 0.1759),
    (0.2789, 0.7024, 0.2672),
    (0.7435, 0.7191, 0.2302),
    (0.7483, 1.0, 0.1677),
    (0.1928, 1.0, -0.1506),
    (0.1, 1.0, 0.9),
];

const BROWN_PALETTE: [Color; 6] = hsl_palette![
    (0.5, 0.0, -1.0),
    (0.435, 1.0, -0.98),
    (0.477, 1.0, -0.96),
    (0.497, 1.0, -0.81),
    (0.45, 1.0, -0.765),
    (0.52, 1.0, -0.76),
];

/// Built-in glow looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlowVariant {
    /// Dim glowing embers
    Charcoal,
    /// Flickering flames
    Fire,
    /// Rippling blue water
    Water,
    /// Green grass with a few flowers
    Meadow,
    /// Pale northern lights
    Aurora,
    /// Dark warm browns
    Brown,
}

impl GlowVariant {
    pub fn config(self) -> EffectResult<GlowConfig> {
        let config = match self {
            Self::Charcoal => {
                GlowConfig::new(&CHARCOAL_PALETTE, 2.0, CycleSpec::range(2, 4))?.with_fps(8.0)
            }
            Self::Fire => {
                GlowConfig::new(&FIRE_PALETTE, 2.0, CycleSpec::range(3, 6))?.with_fps(20.0)
            }
            Self::Water => {
                GlowConfig::new(&WATER_PALETTE, 2.0, CycleSpec::range(3, 6))?.with_fps(20.0)
            }
            Self::Meadow => GlowConfig::new(&MEADOW_PALETTE, 2.0, CycleSpec::range(4, 8))?,
            Self::Aurora => GlowConfig::new(&AURORA_PALETTE, 2.0, CycleSpec::range(6, 10))?,
            Self::Brown => GlowConfig::new(&BROWN_PALETTE, 3.0, CycleSpec::range(6, 10))?,
        };
        Ok(config)
    }
}

/// Glow generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GlowConfig {
    pub palette: Palette,
    /// Bias exponent toward the front of the palette
    pub bend: f32,
    pub cycle: CycleSpec,
    pub fps: Option<f32>,
}

impl GlowConfig {
    pub fn new(colors: &[Color], bend: f32, cycle: CycleSpec) -> EffectResult<Self> {
        Ok(Self {
            palette: Palette::from_slice(colors)?,
            bend: validate_bend(bend)?,
            cycle: cycle.validate()?,
            fps: None,
        })
    }

    /// Glow over a user supplied palette
    pub fn from_palette(colors: &[Color]) -> EffectResult<Self> {
        Self::new(colors, 3.0, CycleSpec::range(4, 8))
    }

    #[must_use]
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = Some(fps);
        self
    }
}

/// Bookkeeping that closes a finite loop
#[derive(Debug, Clone)]
struct Seam {
    loop_len: usize,
    first: Color,
    second: Color,
    /// Palette draws of the first pass, in order
    targets: Vec<Color>,
    cursor: usize,
    replaying: bool,
}

/// State of a single glowing pixel
#[derive(Debug, Clone)]
struct Glowbit {
    last: Color,
    next: Color,
    step: usize,
    steps: usize,
    initial_step: usize,
    count: usize,
    seam: Option<Seam>,
}

impl Glowbit {
    fn new<R: Rng + ?Sized>(
        phase: PhaseAssignment,
        loop_len: usize,
        config: &GlowConfig,
        rng: &mut R,
    ) -> Self {
        let first = config.palette.pick_biased(rng, config.bend);
        let second = config.palette.pick_biased(rng, config.bend);
        // An offset of zero starts right at a segment boundary
        let initial_step = if phase.offset > 0 {
            phase.offset
        } else {
            phase.period
        };
        let seam = (loop_len > 0).then(|| Seam {
            loop_len,
            first,
            second,
            targets: Vec::new(),
            cursor: 0,
            replaying: false,
        });

        Self {
            last: first,
            next: second,
            step: initial_step,
            steps: phase.period,
            initial_step,
            count: 0,
            seam,
        }
    }

    fn next<R: Rng + ?Sized>(&mut self, config: &GlowConfig, rng: &mut R) -> Color {
        if let Some(seam) = &mut self.seam {
            if self.count == seam.loop_len {
                self.count = 0;
                self.step = self.initial_step;
                self.last = seam.first;
                self.next = seam.second;
                seam.cursor = 0;
                seam.replaying = true;
            }
        }

        if self.step == self.steps {
            self.last = self.next;
            self.next = match &mut self.seam {
                Some(seam) if self.count + self.steps >= seam.loop_len => seam.second,
                Some(seam) if self.count + 2 * self.steps >= seam.loop_len => seam.first,
                Some(seam) if seam.replaying => {
                    let target = seam.targets.get(seam.cursor).copied().unwrap_or(seam.first);
                    seam.cursor += 1;
                    target
                }
                Some(seam) => {
                    let target = config.palette.pick_biased(rng, config.bend);
                    seam.targets.push(target);
                    target
                }
                None => config.palette.pick_biased(rng, config.bend),
            };
            self.step = 0;
        }

        self.step += 1;
        if self.seam.is_some() {
            self.count += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let progress = self.step as f32 / self.steps as f32;
        blend_colors(self.last, self.next, progress)
    }
}

/// Smooth per-pixel random walk between palette colors
#[derive(Debug, Clone)]
pub struct GlowEffect<R: Rng = EffectRng> {
    topology: Topology,
    config: GlowConfig,
    rng: R,
    phases: Vec<PhaseAssignment>,
    bits: Vec<Glowbit>,
}

impl GlowEffect {
    pub fn new(topology: &Topology, config: GlowConfig) -> EffectResult<Self> {
        Self::with_rng(topology, config, default_rng())
    }
}

impl<R: Rng> GlowEffect<R> {
    pub fn with_rng(topology: &Topology, config: GlowConfig, rng: R) -> EffectResult<Self> {
        let mut effect = Self {
            topology: topology.clone(),
            config: GlowConfig {
                bend: validate_bend(config.bend)?,
                cycle: config.cycle.validate()?,
                ..config
            },
            rng,
            phases: Vec::new(),
            bits: Vec::new(),
        };
        effect.reset(0)?;
        Ok(effect)
    }

    /// Period and offset of every pixel since the last reset
    pub fn phases(&self) -> &[PhaseAssignment] {
        &self.phases
    }
}

impl<R: Rng> Effect for GlowEffect<R> {
    fn reset(&mut self, loop_len: usize) -> EffectResult<()> {
        self.phases = assign_phases(self.config.cycle, loop_len, self.topology.num_leds());
        self.bits = self
            .phases
            .iter()
            .map(|&phase| Glowbit::new(phase, loop_len, &self.config, &mut self.rng))
            .collect();
        log::debug!(
            "glow reset: {} pixels, loop of {} frames",
            self.bits.len(),
            loop_len
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        let Self {
            topology,
            config,
            rng,
            bits,
            ..
        } = self;
        topology.make_from_fn(
            |i| {
                bits.get_mut(i)
                    .map(|bit| bit.next(config, rng))
                    .unwrap_or(Color::BLACK)
            },
            false,
        )
    }

    fn pacing(&self) -> Pacing {
        Pacing::default().with_fps(self.config.fps)
    }
}
