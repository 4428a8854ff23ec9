//! Random Replacement Policy.
//!
//! This policy evicts a random line from the set. It uses a xorshift generator
//! seeded from the configuration, so a run is reproducible for a given seed.
//! Hits do not update the recency order under this policy.

use super::ReplacementPolicy;
use crate::core::units::cache::CacheSet;

/// Replacement state used when a zero seed is supplied (xorshift is stuck at zero).
const FALLBACK_SEED: u64 = 123_456_789;

/// Random Policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `seed` - Initial generator state. Zero is replaced by a fixed non-zero seed.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Draws a way index uniformly from the set's ways.
    fn select_victim(&mut self, set: &CacheSet) -> usize {
        (self.next() % set.ways() as u64) as usize
    }

    fn tracks_recency(&self) -> bool {
        false
    }
}
