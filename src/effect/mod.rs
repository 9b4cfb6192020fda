//! Effect system with compile-time known effect variants
//!
//! Every generator implements the `Effect` trait. The `EffectSlot` enum
//! holds any of them without boxing, and `EffectId` names every built-in
//! preset.

mod breathe;
mod glitter;
mod glow;
mod meander;
mod rotate;
mod sparkle;

pub use breathe::{BreatheConfig, BreatheEffect, breath_factor};
use embassy_time::Duration;
pub use glitter::{GlitterConfig, GlitterEffect, GlitterVariant};
pub use glow::{GlowConfig, GlowEffect, GlowVariant};
pub use meander::{MeanderEffect, MeanderStyle};
pub use rotate::{RotateConfig, RotateEffect, RotateVariant, spectrum};
pub use sparkle::{
    Channel, SparkleColor, SparkleConfig, SparkleEffect, SparkleEnvelope, SparkleProfile,
    SparkleRecord, SparkleStep, SparkleStrategy, SparkleVariant,
};

use crate::error::EffectResult;
use crate::frame::Frame;
use crate::random::default_rng;
use crate::topology::Topology;

/// Suggested playback rate when a generator has no own preference
pub const DEFAULT_FPS: f32 = 8.0;
/// Suggested loop length when a generator has no own preference
pub const DEFAULT_FRAME_COUNT: usize = 120;

const EFFECT_NAME_CHARCOAL: &str = "charcoal";
const EFFECT_NAME_FIRE: &str = "fire";
const EFFECT_NAME_WATER: &str = "water";
const EFFECT_NAME_MEADOW: &str = "meadow";
const EFFECT_NAME_AURORA: &str = "aurora";
const EFFECT_NAME_BROWN: &str = "brown";
const EFFECT_NAME_SIMPLE_BLINK: &str = "simple_blink";
const EFFECT_NAME_SIMPLE_STARS: &str = "simple_stars";
const EFFECT_NAME_PULSELIGHT: &str = "pulselight";
const EFFECT_NAME_LOOPLIGHT: &str = "looplight";
const EFFECT_NAME_LOOPLIGHT_REVERSE: &str = "looplight_reverse";
const EFFECT_NAME_LOOPLIGHT_SPECTRUM: &str = "looplight_spectrum";
const EFFECT_NAME_SPARKLE_RANDOM: &str = "sparkle_random";
const EFFECT_NAME_SPARKLE_STARS: &str = "sparkle_stars";
const EFFECT_NAME_SILVER: &str = "silver";
const EFFECT_NAME_GOLD: &str = "gold";
const EFFECT_NAME_ROSE_GOLD: &str = "rose_gold";
const EFFECT_NAME_BRONZE: &str = "bronze";
const EFFECT_NAME_STAINLESS_STEEL: &str = "stainless_steel";
const EFFECT_NAME_SPECTRUM: &str = "spectrum";
const EFFECT_NAME_SCATTERED_SPECTRUM: &str = "scattered_spectrum";
const EFFECT_NAME_ROTATING_WHITES: &str = "rotating_whites";
const EFFECT_NAME_MEANDER_SOLID: &str = "meander_solid";
const EFFECT_NAME_MEANDER_SEQUENCE: &str = "meander_sequence";
const EFFECT_NAME_MEANDER_SCATTERED: &str = "meander_scattered";
const EFFECT_NAME_MEANDER_TANDEM: &str = "meander_tandem";
const EFFECT_NAME_MEANDER_MULTI: &str = "meander_multi";
const EFFECT_NAME_MEANDER_BLEND: &str = "meander_blend";

const EFFECT_ID_CHARCOAL: u8 = 0;
const EFFECT_ID_FIRE: u8 = 1;
const EFFECT_ID_WATER: u8 = 2;
const EFFECT_ID_MEADOW: u8 = 3;
const EFFECT_ID_AURORA: u8 = 4;
const EFFECT_ID_BROWN: u8 = 5;
const EFFECT_ID_SIMPLE_BLINK: u8 = 6;
const EFFECT_ID_SIMPLE_STARS: u8 = 7;
const EFFECT_ID_PULSELIGHT: u8 = 8;
const EFFECT_ID_LOOPLIGHT: u8 = 9;
const EFFECT_ID_LOOPLIGHT_REVERSE: u8 = 10;
const EFFECT_ID_LOOPLIGHT_SPECTRUM: u8 = 11;
const EFFECT_ID_SPARKLE_RANDOM: u8 = 12;
const EFFECT_ID_SPARKLE_STARS: u8 = 13;
const EFFECT_ID_SILVER: u8 = 14;
const EFFECT_ID_GOLD: u8 = 15;
const EFFECT_ID_ROSE_GOLD: u8 = 16;
const EFFECT_ID_BRONZE: u8 = 17;
const EFFECT_ID_STAINLESS_STEEL: u8 = 18;
const EFFECT_ID_SPECTRUM: u8 = 19;
const EFFECT_ID_SCATTERED_SPECTRUM: u8 = 20;
const EFFECT_ID_ROTATING_WHITES: u8 = 21;
const EFFECT_ID_MEANDER_SOLID: u8 = 22;
const EFFECT_ID_MEANDER_SEQUENCE: u8 = 23;
const EFFECT_ID_MEANDER_SCATTERED: u8 = 24;
const EFFECT_ID_MEANDER_TANDEM: u8 = 25;
const EFFECT_ID_MEANDER_MULTI: u8 = 26;
const EFFECT_ID_MEANDER_BLEND: u8 = 27;

/// Advisory playback metadata of a generator
///
/// Nothing in the crate enforces it, a scheduler may follow it or not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Suggested frames per second
    pub fps: f32,
    /// Suggested loop length in frames
    pub frame_count: usize,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(DEFAULT_FPS, DEFAULT_FRAME_COUNT)
    }
}

impl Pacing {
    pub const fn new(fps: f32, frame_count: usize) -> Self {
        Self { fps, frame_count }
    }

    /// Override the frame rate if one is given
    #[must_use]
    pub fn with_fps(mut self, fps: Option<f32>) -> Self {
        if let Some(fps) = fps {
            self.fps = fps;
        }
        self
    }

    /// Override the loop length if one is given
    #[must_use]
    pub fn with_frame_count(mut self, frame_count: Option<usize>) -> Self {
        if let Some(frame_count) = frame_count {
            self.frame_count = frame_count;
        }
        self
    }

    /// Time between two frames at the suggested rate
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_duration(&self) -> Duration {
        if self.fps > 0.0 && self.fps.is_finite() {
            Duration::from_micros((1_000_000.0 / f64::from(self.fps)) as u64)
        } else {
            Duration::MAX
        }
    }
}

/// Frame generator
///
/// A scheduler calls `reset` once and then `next_frame` once per output
/// frame.
pub trait Effect {
    /// Bind the generator to a loop length, 0 for unbounded live output
    ///
    /// With a finite `loop_len` the frame stream repeats exactly every
    /// `loop_len` frames.
    fn reset(&mut self, loop_len: usize) -> EffectResult<()>;

    /// Produce the next frame
    fn next_frame(&mut self) -> Frame;

    /// Suggested playback rate and loop length
    fn pacing(&self) -> Pacing {
        Pacing::default()
    }
}

/// Effect slot - enum containing all possible generators
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Smooth drift between palette colors
    Glow(GlowEffect),
    /// Short-lived flashes on free pixels
    Sparkle(SparkleEffect),
    /// Fixed colors with pulsing brightness
    Breathe(BreatheEffect),
    /// Single-frame flashes over a background
    Glitter(GlitterEffect),
    /// Static pattern rotating around the ring
    Rotate(RotateEffect),
    /// Slowly meandering colors
    Meander(MeanderEffect),
}

impl Effect for EffectSlot {
    fn reset(&mut self, loop_len: usize) -> EffectResult<()> {
        match self {
            Self::Glow(effect) => effect.reset(loop_len),
            Self::Sparkle(effect) => effect.reset(loop_len),
            Self::Breathe(effect) => effect.reset(loop_len),
            Self::Glitter(effect) => effect.reset(loop_len),
            Self::Rotate(effect) => effect.reset(loop_len),
            Self::Meander(effect) => effect.reset(loop_len),
        }
    }

    fn next_frame(&mut self) -> Frame {
        match self {
            Self::Glow(effect) => effect.next_frame(),
            Self::Sparkle(effect) => effect.next_frame(),
            Self::Breathe(effect) => effect.next_frame(),
            Self::Glitter(effect) => effect.next_frame(),
            Self::Rotate(effect) => effect.next_frame(),
            Self::Meander(effect) => effect.next_frame(),
        }
    }

    fn pacing(&self) -> Pacing {
        match self {
            Self::Glow(effect) => effect.pacing(),
            Self::Sparkle(effect) => effect.pacing(),
            Self::Breathe(effect) => effect.pacing(),
            Self::Glitter(effect) => effect.pacing(),
            Self::Rotate(effect) => effect.pacing(),
            Self::Meander(effect) => effect.pacing(),
        }
    }
}

/// Known effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Charcoal = EFFECT_ID_CHARCOAL,
    Fire = EFFECT_ID_FIRE,
    Water = EFFECT_ID_WATER,
    Meadow = EFFECT_ID_MEADOW,
    Aurora = EFFECT_ID_AURORA,
    Brown = EFFECT_ID_BROWN,
    SimpleBlink = EFFECT_ID_SIMPLE_BLINK,
    SimpleStars = EFFECT_ID_SIMPLE_STARS,
    Pulselight = EFFECT_ID_PULSELIGHT,
    Looplight = EFFECT_ID_LOOPLIGHT,
    LooplightReverse = EFFECT_ID_LOOPLIGHT_REVERSE,
    LooplightSpectrum = EFFECT_ID_LOOPLIGHT_SPECTRUM,
    SparkleRandom = EFFECT_ID_SPARKLE_RANDOM,
    SparkleStars = EFFECT_ID_SPARKLE_STARS,
    Silver = EFFECT_ID_SILVER,
    Gold = EFFECT_ID_GOLD,
    RoseGold = EFFECT_ID_ROSE_GOLD,
    Bronze = EFFECT_ID_BRONZE,
    StainlessSteel = EFFECT_ID_STAINLESS_STEEL,
    Spectrum = EFFECT_ID_SPECTRUM,
    ScatteredSpectrum = EFFECT_ID_SCATTERED_SPECTRUM,
    RotatingWhites = EFFECT_ID_ROTATING_WHITES,
    MeanderSolid = EFFECT_ID_MEANDER_SOLID,
    MeanderSequence = EFFECT_ID_MEANDER_SEQUENCE,
    MeanderScattered = EFFECT_ID_MEANDER_SCATTERED,
    MeanderTandem = EFFECT_ID_MEANDER_TANDEM,
    MeanderMulti = EFFECT_ID_MEANDER_MULTI,
    MeanderBlend = EFFECT_ID_MEANDER_BLEND,
}

impl EffectId {
    pub const ALL: [Self; 28] = [
        Self::Charcoal,
        Self::Fire,
        Self::Water,
        Self::Meadow,
        Self::Aurora,
        Self::Brown,
        Self::SimpleBlink,
        Self::SimpleStars,
        Self::Pulselight,
        Self::Looplight,
        Self::LooplightReverse,
        Self::LooplightSpectrum,
        Self::SparkleRandom,
        Self::SparkleStars,
        Self::Silver,
        Self::Gold,
        Self::RoseGold,
        Self::Bronze,
        Self::StainlessSteel,
        Self::Spectrum,
        Self::ScatteredSpectrum,
        Self::RotatingWhites,
        Self::MeanderSolid,
        Self::MeanderSequence,
        Self::MeanderScattered,
        Self::MeanderTandem,
        Self::MeanderMulti,
        Self::MeanderBlend,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_CHARCOAL => Self::Charcoal,
            EFFECT_ID_FIRE => Self::Fire,
            EFFECT_ID_WATER => Self::Water,
            EFFECT_ID_MEADOW => Self::Meadow,
            EFFECT_ID_AURORA => Self::Aurora,
            EFFECT_ID_BROWN => Self::Brown,
            EFFECT_ID_SIMPLE_BLINK => Self::SimpleBlink,
            EFFECT_ID_SIMPLE_STARS => Self::SimpleStars,
            EFFECT_ID_PULSELIGHT => Self::Pulselight,
            EFFECT_ID_LOOPLIGHT => Self::Looplight,
            EFFECT_ID_LOOPLIGHT_REVERSE => Self::LooplightReverse,
            EFFECT_ID_LOOPLIGHT_SPECTRUM => Self::LooplightSpectrum,
            EFFECT_ID_SPARKLE_RANDOM => Self::SparkleRandom,
            EFFECT_ID_SPARKLE_STARS => Self::SparkleStars,
            EFFECT_ID_SILVER => Self::Silver,
            EFFECT_ID_GOLD => Self::Gold,
            EFFECT_ID_ROSE_GOLD => Self::RoseGold,
            EFFECT_ID_BRONZE => Self::Bronze,
            EFFECT_ID_STAINLESS_STEEL => Self::StainlessSteel,
            EFFECT_ID_SPECTRUM => Self::Spectrum,
            EFFECT_ID_SCATTERED_SPECTRUM => Self::ScatteredSpectrum,
            EFFECT_ID_ROTATING_WHITES => Self::RotatingWhites,
            EFFECT_ID_MEANDER_SOLID => Self::MeanderSolid,
            EFFECT_ID_MEANDER_SEQUENCE => Self::MeanderSequence,
            EFFECT_ID_MEANDER_SCATTERED => Self::MeanderScattered,
            EFFECT_ID_MEANDER_TANDEM => Self::MeanderTandem,
            EFFECT_ID_MEANDER_MULTI => Self::MeanderMulti,
            EFFECT_ID_MEANDER_BLEND => Self::MeanderBlend,
            _ => return None,
        })
    }

    /// Build the preset for a device
    pub fn to_slot(self, topology: &Topology) -> EffectResult<EffectSlot> {
        let slot = match self {
            Self::Charcoal => glow_slot(topology, GlowVariant::Charcoal)?,
            Self::Fire => glow_slot(topology, GlowVariant::Fire)?,
            Self::Water => glow_slot(topology, GlowVariant::Water)?,
            Self::Meadow => glow_slot(topology, GlowVariant::Meadow)?,
            Self::Aurora => glow_slot(topology, GlowVariant::Aurora)?,
            Self::Brown => glow_slot(topology, GlowVariant::Brown)?,
            Self::SimpleBlink => sparkle_slot(topology, SparkleVariant::SimpleBlink)?,
            Self::SimpleStars => sparkle_slot(topology, SparkleVariant::SimpleStars)?,
            Self::Pulselight => sparkle_slot(topology, SparkleVariant::Pulselight)?,
            Self::Looplight => sparkle_slot(topology, SparkleVariant::Looplight)?,
            Self::LooplightReverse => sparkle_slot(topology, SparkleVariant::LooplightReverse)?,
            Self::LooplightSpectrum => {
                sparkle_slot(topology, SparkleVariant::LooplightSpectrum)?
            }
            Self::SparkleRandom => sparkle_slot(topology, SparkleVariant::SparkleRandom)?,
            Self::SparkleStars => sparkle_slot(topology, SparkleVariant::SparkleStars)?,
            Self::Silver => glitter_slot(topology, GlitterVariant::Silver)?,
            Self::Gold => glitter_slot(topology, GlitterVariant::Gold)?,
            Self::RoseGold => glitter_slot(topology, GlitterVariant::RoseGold)?,
            Self::Bronze => glitter_slot(topology, GlitterVariant::Bronze)?,
            Self::StainlessSteel => glitter_slot(topology, GlitterVariant::StainlessSteel)?,
            Self::Spectrum => rotate_slot(topology, RotateVariant::Spectrum)?,
            Self::ScatteredSpectrum => rotate_slot(topology, RotateVariant::ScatteredSpectrum)?,
            Self::RotatingWhites => rotate_slot(topology, RotateVariant::RotatingWhites)?,
            Self::MeanderSolid => meander_slot(topology, MeanderStyle::Solid),
            Self::MeanderSequence => meander_slot(topology, MeanderStyle::Sequence),
            Self::MeanderScattered => meander_slot(topology, MeanderStyle::Scattered),
            Self::MeanderTandem => meander_slot(topology, MeanderStyle::Tandem),
            Self::MeanderMulti => meander_slot(topology, MeanderStyle::Multi),
            Self::MeanderBlend => meander_slot(topology, MeanderStyle::Blend),
        };
        Ok(slot)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charcoal => EFFECT_NAME_CHARCOAL,
            Self::Fire => EFFECT_NAME_FIRE,
            Self::Water => EFFECT_NAME_WATER,
            Self::Meadow => EFFECT_NAME_MEADOW,
            Self::Aurora => EFFECT_NAME_AURORA,
            Self::Brown => EFFECT_NAME_BROWN,
            Self::SimpleBlink => EFFECT_NAME_SIMPLE_BLINK,
            Self::SimpleStars => EFFECT_NAME_SIMPLE_STARS,
            Self::Pulselight => EFFECT_NAME_PULSELIGHT,
            Self::Looplight => EFFECT_NAME_LOOPLIGHT,
            Self::LooplightReverse => EFFECT_NAME_LOOPLIGHT_REVERSE,
            Self::LooplightSpectrum => EFFECT_NAME_LOOPLIGHT_SPECTRUM,
            Self::SparkleRandom => EFFECT_NAME_SPARKLE_RANDOM,
            Self::SparkleStars => EFFECT_NAME_SPARKLE_STARS,
            Self::Silver => EFFECT_NAME_SILVER,
            Self::Gold => EFFECT_NAME_GOLD,
            Self::RoseGold => EFFECT_NAME_ROSE_GOLD,
            Self::Bronze => EFFECT_NAME_BRONZE,
            Self::StainlessSteel => EFFECT_NAME_STAINLESS_STEEL,
            Self::Spectrum => EFFECT_NAME_SPECTRUM,
            Self::ScatteredSpectrum => EFFECT_NAME_SCATTERED_SPECTRUM,
            Self::RotatingWhites => EFFECT_NAME_ROTATING_WHITES,
            Self::MeanderSolid => EFFECT_NAME_MEANDER_SOLID,
            Self::MeanderSequence => EFFECT_NAME_MEANDER_SEQUENCE,
            Self::MeanderScattered => EFFECT_NAME_MEANDER_SCATTERED,
            Self::MeanderTandem => EFFECT_NAME_MEANDER_TANDEM,
            Self::MeanderMulti => EFFECT_NAME_MEANDER_MULTI,
            Self::MeanderBlend => EFFECT_NAME_MEANDER_BLEND,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_CHARCOAL => Some(Self::Charcoal),
            EFFECT_NAME_FIRE => Some(Self::Fire),
            EFFECT_NAME_WATER => Some(Self::Water),
            EFFECT_NAME_MEADOW => Some(Self::Meadow),
            EFFECT_NAME_AURORA => Some(Self::Aurora),
            EFFECT_NAME_BROWN => Some(Self::Brown),
            EFFECT_NAME_SIMPLE_BLINK => Some(Self::SimpleBlink),
            EFFECT_NAME_SIMPLE_STARS => Some(Self::SimpleStars),
            EFFECT_NAME_PULSELIGHT => Some(Self::Pulselight),
            EFFECT_NAME_LOOPLIGHT => Some(Self::Looplight),
            EFFECT_NAME_LOOPLIGHT_REVERSE => Some(Self::LooplightReverse),
            EFFECT_NAME_LOOPLIGHT_SPECTRUM => Some(Self::LooplightSpectrum),
            EFFECT_NAME_SPARKLE_RANDOM => Some(Self::SparkleRandom),
            EFFECT_NAME_SPARKLE_STARS => Some(Self::SparkleStars),
            EFFECT_NAME_SILVER => Some(Self::Silver),
            EFFECT_NAME_GOLD => Some(Self::Gold),
            EFFECT_NAME_ROSE_GOLD => Some(Self::RoseGold),
            EFFECT_NAME_BRONZE => Some(Self::Bronze),
            EFFECT_NAME_STAINLESS_STEEL => Some(Self::StainlessSteel),
            EFFECT_NAME_SPECTRUM => Some(Self::Spectrum),
            EFFECT_NAME_SCATTERED_SPECTRUM => Some(Self::ScatteredSpectrum),
            EFFECT_NAME_ROTATING_WHITES => Some(Self::RotatingWhites),
            EFFECT_NAME_MEANDER_SOLID => Some(Self::MeanderSolid),
            EFFECT_NAME_MEANDER_SEQUENCE => Some(Self::MeanderSequence),
            EFFECT_NAME_MEANDER_SCATTERED => Some(Self::MeanderScattered),
            EFFECT_NAME_MEANDER_TANDEM => Some(Self::MeanderTandem),
            EFFECT_NAME_MEANDER_MULTI => Some(Self::MeanderMulti),
            EFFECT_NAME_MEANDER_BLEND => Some(Self::MeanderBlend),
            _ => None,
        }
    }
}

fn glow_slot(topology: &Topology, variant: GlowVariant) -> EffectResult<EffectSlot> {
    Ok(EffectSlot::Glow(GlowEffect::new(topology, variant.config()?)?))
}

fn sparkle_slot(topology: &Topology, variant: SparkleVariant) -> EffectResult<EffectSlot> {
    Ok(EffectSlot::Sparkle(SparkleEffect::new(
        topology,
        variant.config()?,
    )))
}

fn glitter_slot(topology: &Topology, variant: GlitterVariant) -> EffectResult<EffectSlot> {
    Ok(EffectSlot::Glitter(GlitterEffect::new(
        topology,
        variant.config()?,
    )))
}

fn rotate_slot(topology: &Topology, variant: RotateVariant) -> EffectResult<EffectSlot> {
    let config = variant.config(topology, &mut default_rng());
    Ok(EffectSlot::Rotate(RotateEffect::new(topology, config)?))
}

fn meander_slot(topology: &Topology, style: MeanderStyle) -> EffectSlot {
    EffectSlot::Meander(MeanderEffect::new(topology, style))
}
