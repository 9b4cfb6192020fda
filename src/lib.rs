#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod color;
pub mod effect;
pub mod error;
pub mod frame;
pub mod palette;
pub mod phase;
pub mod random;
pub mod topology;
pub mod walk;

pub use color::{Color, Rgb, blend_colors, dim_color};
pub use effect::{Effect, EffectId, EffectSlot, Pacing};
pub use error::{EffectError, EffectResult};
pub use frame::Frame;
pub use palette::Palette;
pub use phase::{CycleSpec, PhaseAssignment, assign_phases, candidate_periods};
pub use random::{Arrivals, EffectRng, default_rng};
pub use topology::{Topology, inverse_permutation};
pub use walk::ColorWalk;

pub use embassy_time::Duration;
