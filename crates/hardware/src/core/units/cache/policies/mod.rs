//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim lines in a set-associative cache.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (tail of the set's recency order).
//! - `Random`: Uniformly random resident line; recency is not consulted.

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

use std::fmt;

pub use lru::LruPolicy;
pub use random::RandomPolicy;

use super::CacheSet;

/// Trait for cache replacement policies.
///
/// A policy only chooses the victim. The set itself owns the recency order and
/// the engine decides whether hits promote lines via [`ReplacementPolicy::tracks_recency`].
pub trait ReplacementPolicy: Send + Sync + fmt::Debug {
    /// Selects a victim way in `set` without modifying the set.
    ///
    /// # Arguments
    ///
    /// * `set` - The full cache set to choose from.
    ///
    /// # Returns
    ///
    /// The way index of the line to evict.
    fn select_victim(&mut self, set: &CacheSet) -> usize;

    /// Returns `true` if hits must promote the accessed line to MRU.
    fn tracks_recency(&self) -> bool;
}
