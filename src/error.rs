//! Crate-level error type.
//!
//! Everything that can go wrong inside the kernel is a contract violation and
//! ends the current operation. The only "soft" failures (no path, no
//! intersection) are `Option`s or empty results, never errors.

use thiserror::Error;

use crate::core::hash::StateHash;
use crate::core::int::{Int, NumericError};
use crate::grid::GridError;

/// Simulation errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// Checked arithmetic failed.
    #[error("numeric error: {0}")]
    Numeric(#[from] NumericError),

    /// Grid contract violated.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// Random draw requested over an empty or inverted interval.
    #[error("invalid random range: min {min} larger than max {max}")]
    InvalidRange {
        /// Lower bound.
        min: Int,
        /// Upper bound.
        max: Int,
    },

    /// Random element requested from an empty sequence.
    #[error("cannot draw from an empty sequence")]
    EmptySequence,

    /// The frame counter reached the representable maximum.
    #[error("got to an unusually large time step: {0}")]
    FrameLimitReached(Int),

    /// World configuration cannot produce a valid world.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Binary session encoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Config (JSON) parsing failed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// File system error at the recording boundary.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Replay did not reproduce the expected terminal state.
    #[error("replay mismatch: expected {}, computed {}", hex::encode(.expected), hex::encode(.computed))]
    ReplayMismatch {
        /// Hash recorded at capture time.
        expected: StateHash,
        /// Hash produced by the replay.
        computed: StateHash,
    },
}

impl SimError {
    /// True for failures raised by the simulation kernel itself.
    ///
    /// These are never retried, whatever the boundary failure policy.
    pub fn is_kernel_failure(&self) -> bool {
        !matches!(self, SimError::Codec(_) | SimError::Io(_) | SimError::Config(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SimError>;
