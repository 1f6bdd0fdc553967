//! State Hashing for Verification
//!
//! Provides deterministic hashing of simulation state for:
//! - Replay validation (captured vs. replayed terminal state)
//! - Cheap equality checks between long runs
//!
//! Every value is fed little-endian, in a fixed order.

use sha2::{Sha256, Digest};

use super::int::Int;
use super::pt::Pt;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for simulation state.
///
/// Wraps SHA-256 with helpers for the kernel's integer types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for world state.
    pub fn for_world_state() -> Self {
        Self::new(b"VLOK_WORLD_STATE_V1")
    }

    /// Create hasher for a recorded input sequence.
    pub fn for_recording() -> Self {
        Self::new(b"VLOK_RECORDING_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an Int (little-endian i64).
    #[inline]
    pub fn update_int(&mut self, value: Int) {
        self.hasher.update(value.to_i64().to_le_bytes());
    }

    /// Update with a Pt.
    #[inline]
    pub fn update_pt(&mut self, value: Pt) {
        self.update_int(value.x);
        self.update_int(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute state hash for replay verification.
///
/// This function is called by `World::compute_hash()`.
/// The closure adds the state-specific data.
pub fn compute_state_hash<F>(time_step: Int, seed: Int, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_world_state();

    // Always hash frame counter and seed first
    hasher.update_int(time_step);
    hasher.update_int(seed);

    add_state(&mut hasher);

    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
