//! Per-pixel cycle lengths and starting offsets
//!
//! Neighbouring pixels get different periods and phases through
//! multiplicative hashing, so independent oscillators do not band. For a
//! finite loop only periods dividing the loop length are used, which lets
//! every pixel tile the loop exactly.

use alloc::vec::Vec;

use crate::error::{EffectError, EffectResult};

const PERIOD_PRIME: usize = 13;
const OFFSET_PRIME: usize = 11;
const FALLBACK_PRIME: usize = 7;

/// Cycle length configuration of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSpec {
    /// Every pixel uses the same period
    Fixed(usize),
    /// Periods are chosen from `lo..=hi`
    Range { lo: usize, hi: usize },
}

impl CycleSpec {
    pub const fn range(lo: usize, hi: usize) -> Self {
        Self::Range { lo, hi }
    }

    pub fn validate(self) -> EffectResult<Self> {
        let (lo, hi) = match self {
            Self::Fixed(period) => (period, period),
            Self::Range { lo, hi } => (lo, hi),
        };
        if lo == 0 || lo > hi {
            return Err(EffectError::InvalidCycle { lo, hi });
        }
        Ok(self)
    }
}

/// Period and starting offset of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAssignment {
    pub period: usize,
    /// Position inside the first cycle, always below `period`
    pub offset: usize,
}

/// Periods in `lo..=hi` that divide `loop_len`
///
/// Falls back to the whole range when none does, or when the loop is
/// unbounded (`loop_len == 0`).
pub fn candidate_periods(loop_len: usize, lo: usize, hi: usize) -> Vec<usize> {
    if loop_len > 0 {
        let dividing: Vec<usize> = (lo..=hi)
            .filter(|&period| period > 0 && loop_len.is_multiple_of(period))
            .collect();
        if !dividing.is_empty() {
            return dividing;
        }
    }
    (lo..=hi).filter(|&period| period > 0).collect()
}

/// Distribute periods and offsets over `num_leds` pixels
pub fn assign_phases(cycle: CycleSpec, loop_len: usize, num_leds: usize) -> Vec<PhaseAssignment> {
    let periods = match cycle {
        CycleSpec::Fixed(period) => alloc::vec![period.max(1)],
        CycleSpec::Range { lo, hi } => candidate_periods(loop_len, lo, hi),
    };
    if periods.is_empty() {
        return Vec::new();
    }

    let count = periods.len();
    let period_prime = coprime_step(count, PERIOD_PRIME);
    let offset_prime = coprime_step(count, OFFSET_PRIME);

    (0..num_leds)
        .map(|i| {
            let period = periods[(i * period_prime) % count];
            PhaseAssignment {
                period,
                offset: (i * offset_prime) % period,
            }
        })
        .collect()
}

fn coprime_step(count: usize, prime: usize) -> usize {
    if count.is_multiple_of(prime) {
        FALLBACK_PRIME
    } else {
        prime
    }
}
