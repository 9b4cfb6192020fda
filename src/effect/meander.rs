//! Color meandering effect
//!
//! Slowly and randomly changing colors driven by [`ColorWalk`]. The style
//! decides how the walk is spread over the pixels.
//!
//! A finite loop pre-renders the walk with larger steps and bends the trace
//! so that it ends where it started, so the loop repeats without a jump.

use alloc::vec::Vec;

use heapless::Vec as FixedVec;
use rand::Rng;

use super::{Effect, Pacing};
use crate::color::{Color, blend_colors};
use crate::error::{EffectError, EffectResult};
use crate::frame::Frame;
use crate::random::{EffectRng, default_rng};
use crate::topology::Topology;
use crate::walk::ColorWalk;

const MEANDER_FPS: f32 = 2.0;
const MEANDER_LOOP_FPS: f32 = 0.2;
const MEANDER_FRAMES: usize = 500;
const LOOP_STEP_SCALE: f32 = 10.0;
const LOOP_NOISE_SCALE: f32 = 3.0;
const MAX_WALKS: usize = 3;

const STYLE_NAME_SOLID: &str = "solid";
const STYLE_NAME_SEQUENCE: &str = "sequence";
const STYLE_NAME_SCATTERED: &str = "scattered";
const STYLE_NAME_TANDEM: &str = "tandem";
const STYLE_NAME_MULTI: &str = "multi";
const STYLE_NAME_BLEND: &str = "blend";

/// How the walk is spread over the string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanderStyle {
    /// Every pixel shows the walk
    Solid,
    /// The walk propagates along the string
    Sequence,
    /// Like `Sequence` with the pixel order shuffled
    Scattered,
    /// First half shows the walk, second half its complementary hue
    Tandem,
    /// Three walks on every third pixel
    Multi,
    /// Two walks mixed with a fixed random weight per pixel
    Blend,
}

impl MeanderStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => STYLE_NAME_SOLID,
            Self::Sequence => STYLE_NAME_SEQUENCE,
            Self::Scattered => STYLE_NAME_SCATTERED,
            Self::Tandem => STYLE_NAME_TANDEM,
            Self::Multi => STYLE_NAME_MULTI,
            Self::Blend => STYLE_NAME_BLEND,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            STYLE_NAME_SOLID => Some(Self::Solid),
            STYLE_NAME_SEQUENCE => Some(Self::Sequence),
            STYLE_NAME_SCATTERED => Some(Self::Scattered),
            STYLE_NAME_TANDEM => Some(Self::Tandem),
            STYLE_NAME_MULTI => Some(Self::Multi),
            STYLE_NAME_BLEND => Some(Self::Blend),
            _ => None,
        }
    }

    const fn walk_count(self) -> usize {
        match self {
            Self::Multi => 3,
            Self::Blend => 2,
            _ => 1,
        }
    }
}

/// A walk, either stepped live or played back from a closed trace
#[derive(Debug, Clone)]
struct Walker {
    walk: ColorWalk,
    trace: Vec<Color>,
    cursor: usize,
}

impl Walker {
    #[allow(clippy::cast_precision_loss)]
    fn new<R: Rng + ?Sized>(rng: &mut R, loop_len: usize) -> Self {
        let mut walk = ColorWalk::new(rng);
        if loop_len == 0 {
            return Self {
                walk,
                trace: Vec::new(),
                cursor: 0,
            };
        }

        walk.step_length *= LOOP_STEP_SCALE;
        walk.noise_level *= LOOP_NOISE_SCALE;
        let start = walk.point();
        let points: Vec<[f32; 3]> = (0..loop_len)
            .map(|_| {
                walk.step(&mut *rng);
                walk.point()
            })
            .collect();
        let end = points.last().copied().unwrap_or(start);
        let drift = [end[0] - start[0], end[1] - start[1], end[2] - start[2]];
        // Remove the drift linearly, the last point lands on the start
        let trace = points
            .iter()
            .enumerate()
            .map(|(k, point)| {
                let share = (k + 1) as f32 / loop_len as f32;
                Color::from_point([
                    point[0] - share * drift[0],
                    point[1] - share * drift[1],
                    point[2] - share * drift[2],
                ])
            })
            .collect();

        Self {
            walk,
            trace,
            cursor: 0,
        }
    }

    fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Color {
        if self.trace.is_empty() {
            self.walk.step(rng);
            return self.walk.get();
        }
        let color = self.trace[self.cursor];
        self.cursor = (self.cursor + 1) % self.trace.len();
        color
    }

    /// Color emitted `back` frames before the first one of the loop
    fn before_start(&self, back: usize) -> Color {
        match self.trace.len() {
            0 => Color::WHITE,
            len => self.trace[len - 1 - (back % len)],
        }
    }
}

/// Random walk through colors spread over the string
#[derive(Debug, Clone)]
pub struct MeanderEffect<R: Rng = EffectRng> {
    topology: Topology,
    style: Option<MeanderStyle>,
    rng: R,
    walkers: FixedVec<Walker, MAX_WALKS>,
    /// Blend weight of the second walk per pixel
    weights: Vec<f32>,
    permutation: Vec<usize>,
    /// Shifted pattern of the propagating styles
    pattern: Frame,
    looping: bool,
}

impl MeanderEffect {
    pub fn new(topology: &Topology, style: MeanderStyle) -> Self {
        Self::with_rng(topology, style, default_rng())
    }

    /// Effect for a style given by name
    ///
    /// An unknown name is reported by `reset`, the effect then shows black.
    pub fn from_name(topology: &Topology, name: &str) -> Self {
        Self::from_name_with_rng(topology, name, default_rng())
    }
}

impl<R: Rng> MeanderEffect<R> {
    pub fn with_rng(topology: &Topology, style: MeanderStyle, rng: R) -> Self {
        Self::build(topology, Some(style), rng)
    }

    pub fn from_name_with_rng(topology: &Topology, name: &str, rng: R) -> Self {
        let style = MeanderStyle::parse_from_str(name);
        if style.is_none() {
            log::warn!("unknown meander style {name:?}");
        }
        Self::build(topology, style, rng)
    }

    fn build(topology: &Topology, style: Option<MeanderStyle>, rng: R) -> Self {
        let mut effect = Self {
            topology: topology.clone(),
            style,
            rng,
            walkers: FixedVec::new(),
            weights: Vec::new(),
            permutation: Vec::new(),
            pattern: topology.make_solid(Color::BLACK),
            looping: false,
        };
        // Only an unknown style fails, the effect stays black then
        effect.reset(0).ok();
        effect
    }

    pub const fn style(&self) -> Option<MeanderStyle> {
        self.style
    }

    /// History of the loop in logical order, newest first
    fn prefill(&self, circular: bool) -> Frame {
        match self.walkers.first() {
            Some(walker) => self
                .topology
                .make_from_fn(|i| walker.before_start(i), circular),
            None => self.topology.make_solid(Color::WHITE),
        }
    }

    fn step_all(&mut self) -> FixedVec<Color, MAX_WALKS> {
        let rng = &mut self.rng;
        self.walkers
            .iter_mut()
            .map(|walker| walker.next(&mut *rng))
            .collect()
    }

    fn first_color(&mut self) -> Color {
        match self.walkers.first_mut() {
            Some(walker) => walker.next(&mut self.rng),
            None => Color::BLACK,
        }
    }
}

impl<R: Rng> Effect for MeanderEffect<R> {
    fn reset(&mut self, loop_len: usize) -> EffectResult<()> {
        self.looping = loop_len > 0;
        self.walkers.clear();
        self.weights.clear();
        self.permutation.clear();
        self.pattern = self.topology.make_solid(Color::BLACK);

        let Some(style) = self.style else {
            return Err(EffectError::UnknownStyle);
        };

        let rng = &mut self.rng;
        self.walkers = (0..style.walk_count())
            .map(|_| Walker::new(&mut *rng, loop_len))
            .collect();
        match style {
            MeanderStyle::Sequence => self.pattern = self.prefill(true),
            MeanderStyle::Scattered => {
                self.permutation = self.topology.random_permutation(&mut self.rng);
                self.pattern = self.prefill(false);
            }
            MeanderStyle::Blend => {
                self.weights = (0..self.topology.num_leds())
                    .map(|_| self.rng.random())
                    .collect();
            }
            MeanderStyle::Solid | MeanderStyle::Tandem | MeanderStyle::Multi => {}
        }
        log::debug!(
            "meander reset: {} style, loop of {} frames",
            style.as_str(),
            loop_len
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        let Some(style) = self.style else {
            return self.topology.make_solid(Color::BLACK);
        };

        match style {
            MeanderStyle::Solid => {
                let color = self.first_color();
                self.topology.make_solid(color)
            }
            MeanderStyle::Sequence => {
                let color = self.first_color();
                self.pattern = self.topology.shift(&self.pattern, 1, color, true);
                self.pattern.clone()
            }
            MeanderStyle::Scattered => {
                let color = self.first_color();
                self.pattern = self.topology.shift(&self.pattern, 1, color, false);
                self.topology
                    .permute(&self.pattern, &self.permutation, false)
            }
            MeanderStyle::Tandem => {
                let color = self.first_color();
                let complement = color.complement();
                let half = self.topology.num_leds() / 2;
                self.topology
                    .make_from_fn(|i| if i < half { color } else { complement }, false)
            }
            MeanderStyle::Multi => {
                let colors = self.step_all();
                self.topology.make_from_fn(
                    |i| {
                        colors
                            .get(i % colors.len().max(1))
                            .copied()
                            .unwrap_or(Color::BLACK)
                    },
                    false,
                )
            }
            MeanderStyle::Blend => {
                let colors = self.step_all();
                let (first, second) = match colors.as_slice() {
                    [first, second, ..] => (*first, *second),
                    _ => (Color::BLACK, Color::BLACK),
                };
                let weights = &self.weights;
                self.topology.make_from_fn(
                    |i| blend_colors(first, second, weights.get(i).copied().unwrap_or(0.0)),
                    false,
                )
            }
        }
    }

    fn pacing(&self) -> Pacing {
        let fps = if self.looping {
            MEANDER_LOOP_FPS
        } else {
            MEANDER_FPS
        };
        Pacing::new(fps, MEANDER_FRAMES)
    }
}
