//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ algorithm for fast, high-quality, deterministic randomness.
//! Given the same seed, produces identical sequence on all platforms.
//!
//! The generator is an explicit value owned by whoever needs randomness
//! (usually the `World`); there is no process-wide instance.

use serde::{Serialize, Deserialize};

use super::int::Int;
use crate::error::{Result, SimError};

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform, as long as draws happen in the
/// same order.
///
/// # Example
///
/// ```
/// use vlok::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Create an RNG from a simulation seed.
    ///
    /// The seed's bit pattern is used as is, so negative seeds are valid.
    pub fn from_seed(seed: Int) -> Self {
        Self::new(seed.to_i64() as u64)
    }

    /// Reset to the state [`from_seed`](Self::from_seed) would produce.
    pub fn seed(&mut self, seed: Int) {
        *self = Self::from_seed(seed);
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a non-negative 63-bit value.
    #[inline]
    pub fn next_i63(&mut self) -> Int {
        Int::new((self.next_u64() >> 1) as i64)
    }

    /// Generate a random integer in range [min, max].
    ///
    /// Simple modulo over a 63-bit draw: slight bias for very large
    /// ranges, but identical on every platform.
    pub fn uniform_int(&mut self, min: Int, max: Int) -> Result<Int> {
        if min.gt(max) {
            return Err(SimError::InvalidRange { min, max });
        }
        let range = max.minus(min)?.plus(Int::ONE)?;
        Ok(self.next_i63().modulo(range)?.plus(min)?)
    }

    /// Generate a random index in range [0, len).
    pub fn random_index(&mut self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(SimError::EmptySequence);
        }
        let last = Int::from_index(len - 1)?;
        Ok(self.uniform_int(Int::ZERO, last)?.to_index()?)
    }

    /// Select a random element from a slice.
    pub fn random_element<'a, T>(&mut self, slice: &'a [T]) -> Result<&'a T> {
        let idx = self.random_index(slice.len())?;
        slice.get(idx).ok_or(SimError::EmptySequence)
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_rng_known_values() {
        let mut rng = DeterministicRng::new(42);
        let val1 = rng.next_u64();
        let val2 = rng.next_u64();
        let val3 = rng.next_u64();

        // These values must never change!
        // If they do, existing recordings will replay differently.
        assert_eq!(val1, 16629283624882167704);
        assert_eq!(val2, 1420492921613871959);
        assert_eq!(val3, 9768315062676884790);
    }

    #[test]
    fn test_uniform_int_known_values() {
        let mut rng = DeterministicRng::from_seed(Int::new(7));
        let rolls: Vec<i64> = (0..10)
            .map(|_| rng.uniform_int(Int::ONE, Int::new(6)).unwrap().to_i64())
            .collect();
        assert_eq!(rolls, vec![2, 6, 3, 6, 2, 3, 1, 5, 4, 3]);
    }

    #[test]
    fn test_reseed_restarts_sequence() {
        let mut rng = DeterministicRng::from_seed(Int::new(99));
        let first: Vec<u64> = (0..5).map(|_| rng.next_u64()).collect();
        rng.seed(Int::new(99));
        let second: Vec<u64> = (0..5).map(|_| rng.next_u64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_uniform_int_range() {
        let mut rng = DeterministicRng::new(5678);

        for _ in 0..1000 {
            let val = rng.uniform_int(Int::new(-10), Int::new(10)).unwrap();
            assert!(val.between(Int::new(-10), Int::new(10)));
        }

        // Edge case: min = max
        assert_eq!(rng.uniform_int(Int::new(5), Int::new(5)).unwrap(), Int::new(5));
    }

    #[test]
    fn test_uniform_int_rejects_bad_ranges() {
        let mut rng = DeterministicRng::new(1);
        assert!(matches!(
            rng.uniform_int(Int::new(3), Int::new(2)),
            Err(SimError::InvalidRange { .. })
        ));
        // Width of the full i64 range does not fit.
        assert!(matches!(
            rng.uniform_int(Int::MIN, Int::MAX),
            Err(SimError::Numeric(_))
        ));
    }

    #[test]
    fn test_random_element() {
        let mut rng = DeterministicRng::new(1234);
        let items = ['a', 'b', 'c'];
        for _ in 0..100 {
            assert!(items.contains(rng.random_element(&items).unwrap()));
        }

        let empty: [char; 0] = [];
        assert!(matches!(rng.random_element(&empty), Err(SimError::EmptySequence)));
        assert!(matches!(rng.random_index(0), Err(SimError::EmptySequence)));
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = DeterministicRng::new(5555);

        // Advance some
        for _ in 0..50 {
            rng.next_u64();
        }

        // Save state
        let saved_state = rng.state();

        // Advance more
        let next_values: Vec<u64> = (0..10).map(|_| rng.next_u64()).collect();

        // Restore state
        rng.set_state(saved_state);

        // Should produce same values again
        for expected in next_values {
            assert_eq!(rng.next_u64(), expected);
        }
    }
}
