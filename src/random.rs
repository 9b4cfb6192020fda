//! Random sources shared by the generators
//!
//! Every generator owns its own source. Production code gets a
//! process-seeded [`EffectRng`]; tests inject a seeded one.

use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Poisson};

use crate::error::{EffectError, EffectResult};

/// Default random source of a generator
pub type EffectRng = SmallRng;

#[cfg(not(feature = "std"))]
const DEFAULT_RNG_SEED: u64 = 0x5EED_1ED5;

/// Create a freshly seeded random source
#[cfg(feature = "std")]
pub fn default_rng() -> EffectRng {
    SmallRng::from_os_rng()
}

/// Create the default random source
///
/// Without an OS entropy source every instance starts from the same seed.
#[cfg(not(feature = "std"))]
pub fn default_rng() -> EffectRng {
    SmallRng::seed_from_u64(DEFAULT_RNG_SEED)
}

/// Poisson distributed event counts with a given mean per frame
#[derive(Debug, Clone)]
pub struct Arrivals {
    frequency: f64,
    dist: Option<Poisson<f64>>,
}

impl Arrivals {
    pub fn new(frequency: f64) -> EffectResult<Self> {
        if !frequency.is_finite() || frequency < 0.0 {
            return Err(EffectError::InvalidFrequency(frequency));
        }
        let dist = if frequency > 0.0 {
            Some(Poisson::new(frequency).map_err(|_| EffectError::InvalidFrequency(frequency))?)
        } else {
            None
        };
        Ok(Self { frequency, dist })
    }

    /// Mean number of events per frame
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Draw the number of events for one frame
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match &self.dist {
            Some(dist) => {
                let count: f64 = dist.sample(rng);
                count as usize
            }
            None => 0,
        }
    }
}
