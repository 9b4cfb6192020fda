//! Sparkle effect
//!
//! Short-lived flashes appear at random free pixels, follow their strategy
//! for a while and release the pixel again.
//!
//! With a finite loop the effect first simulates one sparkle lifetime (the
//! lead-in) before the first frame it emits. Near the end of the loop the
//! pixels used by the lead-in are held back from new sparkles, and once the
//! loop length is reached the lead-in sparkles are replayed. After one lead-in
//! past the loop length the state matches the one at the first frame, so
//! the births of the first pass are replayed from then on and the output
//! repeats exactly.

mod profile;

use alloc::vec::Vec;
use core::fmt::Debug;

pub use profile::{Channel, SparkleColor, SparkleEnvelope, SparkleProfile};
use rand::Rng;

use super::{Effect, Pacing};
use crate::color::Color;
use crate::error::{EffectError, EffectResult};
use crate::frame::Frame;
use crate::random::{Arrivals, EffectRng, default_rng};
use crate::topology::Topology;

const SPARKLE_FPS: f32 = 12.0;
const SPECTRUM_CYCLE: usize = 240;
/// Longest sparkle lifetime measured when the loop is shorter
const LIFETIME_PROBE_LIMIT: usize = 4096;

/// Outcome of advancing a sparkle by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SparkleStep {
    /// Still running, the pixel shows this color
    Continuing(Color),
    /// Finished, the pixel reverts to the background and is freed
    Completed,
    /// Cut short, the pixel is freed and keeps its last color until a new
    /// sparkle lands on it or the loop wraps
    Aborted,
}

impl SparkleStep {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continuing(_))
    }
}

/// Birth and evolution of a single sparkle
pub trait SparkleStrategy {
    /// Per-sparkle state fixed at birth
    type Descriptor: Clone + Debug;

    /// Create the descriptor of a sparkle born at `time` on pixel `index`
    fn create<R: Rng + ?Sized>(&self, index: usize, time: usize, rng: &mut R)
    -> Self::Descriptor;

    /// Color of the sparkle `elapsed` frames after its birth
    fn advance(&self, index: usize, elapsed: usize, descriptor: &Self::Descriptor) -> SparkleStep;
}

/// A running sparkle
#[derive(Debug, Clone, PartialEq)]
pub struct SparkleRecord<D> {
    pub index: usize,
    pub descriptor: D,
    pub start: usize,
}

/// Sparkle generator configuration
#[derive(Debug, Clone)]
pub struct SparkleConfig<S = SparkleProfile> {
    pub strategy: S,
    /// Expected number of new sparkles per frame
    pub arrivals: Arrivals,
    pub background: Color,
    pub fps: Option<f32>,
    pub frame_count: Option<usize>,
}

impl<S: SparkleStrategy> SparkleConfig<S> {
    pub fn new(strategy: S, frequency: f64, background: Color) -> EffectResult<Self> {
        Ok(Self {
            strategy,
            arrivals: Arrivals::new(frequency)?,
            background,
            fps: None,
            frame_count: None,
        })
    }

    #[must_use]
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = Some(fps);
        self
    }

    #[must_use]
    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = Some(frame_count);
        self
    }
}

impl SparkleConfig {
    /// Sparkles drawn uniformly from a user palette
    pub fn from_palette(colors: &[Color]) -> EffectResult<Self> {
        let profile = SparkleProfile::new(
            SparkleColor::selected(colors, None)?,
            SparkleEnvelope::pulse(16, 8, 16),
        );
        Ok(Self::new(profile, 3.0, Color::BLACK)?.with_fps(SPARKLE_FPS))
    }
}

/// Built-in sparkle looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkleVariant {
    /// Saturated colors blinking for a single frame
    SimpleBlink,
    /// White stars blinking for a single frame
    SimpleStars,
    /// Slowly pulsing random hues
    Pulselight,
    /// Rising from black through the hue to white
    Looplight,
    /// Looplight running backwards, white first
    LooplightReverse,
    /// Looplight with the hue sweeping the wheel over time
    LooplightSpectrum,
    SparkleRandom,
    /// Twinkling whites of varying color temperature
    SparkleStars,
}

impl SparkleVariant {
    pub fn config(self) -> EffectResult<SparkleConfig> {
        let any = Channel::Any;
        let config = match self {
            Self::SimpleBlink => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::random(any, Channel::Fixed(1.0), Channel::Fixed(0.0)),
                    SparkleEnvelope::pulse(0, 1, 0),
                ),
                8.0,
                Color::BLACK,
            )?,
            Self::SimpleStars => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::Fixed(Color::WHITE),
                    SparkleEnvelope::pulse(0, 1, 0),
                ),
                8.0,
                Color::BLACK,
            )?,
            Self::Pulselight => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::random(any, any, Channel::Fixed(0.0)),
                    SparkleEnvelope::pulse(18, 4, 18),
                ),
                3.0,
                Color::BLACK,
            )?
            .with_fps(SPARKLE_FPS),
            Self::Looplight => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::random(any, Channel::Range(0.5, 1.0), any),
                    SparkleEnvelope::looping(16, 8),
                ),
                4.0,
                Color::BLACK,
            )?,
            Self::LooplightReverse => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::random(any, Channel::Range(0.5, 1.0), any),
                    SparkleEnvelope::Loop {
                        up: 8,
                        down: 16,
                        sat_up: 0.0,
                        sat_down: 1.0,
                        linear: false,
                    },
                ),
                4.0,
                Color::BLACK,
            )?,
            Self::LooplightSpectrum => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::circular(SPECTRUM_CYCLE),
                    SparkleEnvelope::looping(16, 8),
                ),
                4.0,
                Color::BLACK,
            )?
            .with_frame_count(SPECTRUM_CYCLE),
            Self::SparkleRandom => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::random(any, any, any),
                    SparkleEnvelope::pulse(16, 8, 16),
                ),
                3.0,
                Color::BLACK,
            )?
            .with_fps(SPARKLE_FPS),
            Self::SparkleStars => SparkleConfig::new(
                SparkleProfile::new(
                    SparkleColor::tinted_white(0.0, 0.5, 0.5, 0.5),
                    SparkleEnvelope::pulse(16, 8, 16),
                ),
                3.0,
                Color::BLACK,
            )?
            .with_fps(SPARKLE_FPS),
        };
        Ok(config)
    }
}

/// Bookkeeping of a finite loop
#[derive(Debug, Clone)]
struct LoopState<D> {
    loop_len: usize,
    /// Frames from birth until a sparkle completes
    lifetime: usize,
    lead_in: Vec<SparkleRecord<D>>,
    /// Births of the first pass, in order
    births: Vec<SparkleRecord<D>>,
    cursor: usize,
    replaying: bool,
}

/// Event driven flashes on free pixels
#[derive(Debug, Clone)]
pub struct SparkleEffect<S: SparkleStrategy = SparkleProfile, R: Rng = EffectRng> {
    topology: Topology,
    config: SparkleConfig<S>,
    rng: R,
    frame: Frame,
    /// Time of the next frame
    clock: usize,
    available: Vec<usize>,
    active: Vec<SparkleRecord<S::Descriptor>>,
    /// Free pixels held back for the lead-in replay
    reserved: Vec<usize>,
    /// Busy pixels that move to `reserved` once released
    pending: Vec<usize>,
    /// Pixels already taken over by a replayed sparkle
    superseded: Vec<usize>,
    looping: Option<LoopState<S::Descriptor>>,
    inert: bool,
}

impl<S: SparkleStrategy> SparkleEffect<S> {
    pub fn new(topology: &Topology, config: SparkleConfig<S>) -> Self {
        Self::with_rng(topology, config, default_rng())
    }
}

impl<S: SparkleStrategy, R: Rng> SparkleEffect<S, R> {
    pub fn with_rng(topology: &Topology, config: SparkleConfig<S>, rng: R) -> Self {
        let mut effect = Self {
            frame: topology.make_solid(config.background),
            topology: topology.clone(),
            config,
            rng,
            clock: 0,
            available: Vec::new(),
            active: Vec::new(),
            reserved: Vec::new(),
            pending: Vec::new(),
            superseded: Vec::new(),
            looping: None,
            inert: false,
        };
        effect.clear();
        effect
    }

    /// Pixels free for new sparkles
    pub fn available(&self) -> &[usize] {
        &self.available
    }

    /// Pixels not available for new sparkles, sorted
    ///
    /// Includes the pixels held back for the lead-in replay.
    pub fn active_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .active
            .iter()
            .map(|record| record.index)
            .chain(self.reserved.iter().copied())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Running sparkles
    pub fn records(&self) -> &[SparkleRecord<S::Descriptor>] {
        &self.active
    }

    fn clear(&mut self) {
        self.frame = self.topology.make_solid(self.config.background);
        self.clock = 0;
        self.available = (0..self.topology.num_leds()).collect();
        self.active.clear();
        self.reserved.clear();
        self.pending.clear();
        self.superseded.clear();
        self.looping = None;
        self.inert = false;
    }

    /// Frames until a freshly born sparkle reports a terminal step
    fn probe_lifetime(&mut self, limit: usize) -> Option<usize> {
        let probe = self.config.strategy.create(0, 0, &mut self.rng);
        (0..=limit).find(|&elapsed| {
            self.config
                .strategy
                .advance(0, elapsed, &probe)
                .is_terminal()
        })
    }

    fn step(&mut self) {
        let now = self.clock;
        self.clock += 1;

        let mut looping = self.looping.take();
        match looping.as_mut() {
            Some(state) if now >= state.loop_len => self.replay_lead_in(state, now),
            Some(state) => {
                if now + state.lifetime > state.loop_len {
                    self.claim_lead_in(state, now);
                }
                if state.replaying {
                    self.replay_births(state, now);
                } else {
                    self.spawn(now, Some(&mut state.births));
                }
            }
            None => self.spawn(now, None),
        }
        self.advance_active(now);

        if let Some(state) = looping.as_mut() {
            if self.clock == state.loop_len + state.lifetime {
                self.wrap(state);
            }
        }
        self.looping = looping;
    }

    fn spawn(&mut self, now: usize, mut births: Option<&mut Vec<SparkleRecord<S::Descriptor>>>) {
        let count = self.config.arrivals.sample(&mut self.rng);
        for _ in 0..count {
            if self.available.is_empty() {
                break;
            }
            let pos = self.rng.random_range(0..self.available.len());
            let index = self.available.swap_remove(pos);
            let record = SparkleRecord {
                index,
                descriptor: self.config.strategy.create(index, now, &mut self.rng),
                start: now,
            };
            if let Some(births) = births.as_mut() {
                births.push(record.clone());
            }
            self.active.push(record);
        }
    }

    fn replay_births(&mut self, state: &mut LoopState<S::Descriptor>, now: usize) {
        while let Some(record) = state
            .births
            .get(state.cursor)
            .filter(|record| record.start == now)
        {
            state.cursor += 1;
            take(&mut self.available, record.index);
            self.active.push(record.clone());
        }
    }

    /// Hold back lead-in pixels whose replay would otherwise collide with a
    /// new sparkle
    fn claim_lead_in(&mut self, state: &LoopState<S::Descriptor>, now: usize) {
        for record in &state.lead_in {
            if record.start + state.loop_len >= now + state.lifetime {
                continue;
            }
            let index = record.index;
            if take(&mut self.available, index) {
                self.reserved.push(index);
            } else if !self.reserved.contains(&index) && !self.pending.contains(&index) {
                self.pending.push(index);
            }
        }
    }

    fn replay_lead_in(&mut self, state: &LoopState<S::Descriptor>, now: usize) {
        let start = now - state.loop_len;
        for record in state.lead_in.iter().filter(|record| record.start == start) {
            let index = record.index;
            if !take(&mut self.reserved, index) && !take(&mut self.available, index) {
                // Still lit by a sparkle ending this frame
                take(&mut self.pending, index);
                self.superseded.push(index);
            }
            self.active.push(SparkleRecord {
                index,
                descriptor: record.descriptor.clone(),
                start: now,
            });
        }
    }

    fn advance_active(&mut self, now: usize) {
        let mut released = Vec::new();
        let Self {
            topology,
            config,
            frame,
            active,
            ..
        } = self;
        active.retain(|record| {
            let elapsed = now.saturating_sub(record.start);
            match config
                .strategy
                .advance(record.index, elapsed, &record.descriptor)
            {
                SparkleStep::Continuing(color) => {
                    topology.modify(frame, record.index, color, false);
                    true
                }
                step => {
                    released.push((record.index, step));
                    false
                }
            }
        });

        for (index, step) in released {
            self.release(index, step);
        }
    }

    fn release(&mut self, index: usize, step: SparkleStep) {
        if take(&mut self.superseded, index) {
            return;
        }
        if step == SparkleStep::Completed {
            self.topology
                .modify(&mut self.frame, index, self.config.background, false);
        }
        if take(&mut self.pending, index) {
            self.reserved.push(index);
        } else {
            self.available.push(index);
        }
    }

    /// Move the clock back by one loop length
    fn wrap(&mut self, state: &mut LoopState<S::Descriptor>) {
        let loop_len = state.loop_len;
        self.clock -= loop_len;
        state.replaying = true;
        state.cursor = 0;

        let mut outlived = Vec::new();
        self.active
            .retain_mut(|record| match record.start.checked_sub(loop_len) {
                Some(start) => {
                    record.start = start;
                    true
                }
                None => {
                    outlived.push(record.index);
                    false
                }
            });
        for index in outlived {
            log::warn!("sparkle on pixel {index} outlived the lead-in");
            self.release(index, SparkleStep::Completed);
        }
        self.clear_free_pixels();
    }

    /// Paint the background over pixels left lit by aborted sparkles
    fn clear_free_pixels(&mut self) {
        let background = self.config.background;
        for &index in self.available.iter().chain(&self.reserved) {
            self.topology.modify(&mut self.frame, index, background, false);
        }
    }
}

impl<S: SparkleStrategy, R: Rng> Effect for SparkleEffect<S, R> {
    fn reset(&mut self, loop_len: usize) -> EffectResult<()> {
        self.clear();
        if loop_len == 0 {
            return Ok(());
        }

        let limit = loop_len.max(LIFETIME_PROBE_LIMIT);
        let lifetime = match self.probe_lifetime(limit) {
            Some(lifetime) if lifetime <= loop_len => lifetime,
            Some(lead_in) => {
                self.inert = true;
                log::warn!("sparkle lead-in of {lead_in} frames exceeds a loop of {loop_len}");
                return Err(EffectError::LoopTooShort { loop_len, lead_in });
            }
            None => {
                self.inert = true;
                log::warn!("sparkle does not end within {limit} frames");
                return Err(EffectError::EndlessSparkle { limit });
            }
        };
        for _ in 0..lifetime {
            self.step();
        }
        self.clear_free_pixels();
        self.looping = Some(LoopState {
            loop_len,
            lifetime,
            lead_in: self.active.clone(),
            births: Vec::new(),
            cursor: 0,
            replaying: false,
        });
        log::debug!(
            "sparkle reset: loop of {} frames, lead-in of {} frames with {} sparkles",
            loop_len,
            lifetime,
            self.active.len()
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Frame {
        if !self.inert {
            self.step();
        }
        self.frame.clone()
    }

    fn pacing(&self) -> Pacing {
        Pacing::default()
            .with_fps(self.config.fps)
            .with_frame_count(self.config.frame_count)
    }
}

/// Remove `index` from `set`, returning whether it was present
fn take(set: &mut Vec<usize>, index: usize) -> bool {
    match set.iter().position(|&item| item == index) {
        Some(pos) => {
            set.swap_remove(pos);
            true
        }
        None => false,
    }
}
