//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! The recency order lives in each [`CacheSet`]; index 0 is the Most Recently Used
//! line and the last index is the Least Recently Used one.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - promotion on hit: O(W) where W is the number of ways (associativity)
//!   - `select_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit within the associativity
//! - **Worst Case:** Cyclic scans one line larger than the set (thrashing)

use super::ReplacementPolicy;
use crate::core::units::cache::CacheSet;

/// LRU Policy. Stateless: the order it reads is kept by the sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Returns the way at the tail of the recency order.
    fn select_victim(&mut self, set: &CacheSet) -> usize {
        set.lru_way()
    }

    fn tracks_recency(&self) -> bool {
        true
    }
}
