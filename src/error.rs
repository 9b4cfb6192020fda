//! Crate error type
//!
//! Construction validates configuration up front, so steady-state frame
//! generation never fails. The only error surfaced later is from `reset`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("cycle length must be positive and ordered, got {lo}..={hi}")]
    InvalidCycle { lo: usize, hi: usize },
    #[error("sparkle frequency must be finite and non-negative, got {0}")]
    InvalidFrequency(f64),
    #[error("palette bend must be finite and non-negative, got {0}")]
    InvalidBend(f32),
    #[error("rotation step must be positive")]
    InvalidStep,
    #[error("permutation does not cover {expected} pixels")]
    InvalidPermutation { expected: usize },
    #[error("weights do not match the {expected} choices they select from")]
    MismatchedWeights { expected: usize },
    #[error("a device has between one and eight strings, got {count}")]
    InvalidStrings { count: usize },
    #[error("unknown meander style")]
    UnknownStyle,
    #[error("loop of {loop_len} frames is shorter than the {lead_in} frame sparkle lead-in")]
    LoopTooShort { loop_len: usize, lead_in: usize },
    #[error("sparkle does not end within {limit} frames")]
    EndlessSparkle { limit: usize },
}

pub type EffectResult<T> = Result<T, EffectError>;
