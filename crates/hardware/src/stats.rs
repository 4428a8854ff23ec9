//! Simulation statistics collection.
//!
//! This module tracks the counters of a trace replay. It provides:
//! 1. **Demand traffic:** Reads, writes, hits and misses of real accesses.
//! 2. **Writebacks:** Dirty evictions, whichever access caused them.
//! 3. **Prefetch traffic:** Reads issued by the prefetcher and whether they filled a line.

use serde::Serialize;

/// Counters updated by the access driver.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Demand read accesses.
    pub reads: u64,
    /// Demand write accesses.
    pub writes: u64,
    /// Demand accesses that found a valid resident line.
    pub hits: u64,
    /// Demand accesses that did not.
    pub misses: u64,
    /// Evictions of Modified or Owned lines (demand and speculative fills).
    pub writebacks: u64,
    /// Speculative reads reported by the prefetcher.
    pub prefetches_issued: u64,
    /// Speculative reads that brought a new line in.
    pub prefetch_fills: u64,
    /// Speculative reads whose line was already resident.
    pub prefetch_redundant: u64,
}

impl CacheStats {
    /// Total demand accesses.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Fraction of demand accesses that hit, 0.0 before any access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fraction of demand accesses that missed, 0.0 before any access.
    pub fn miss_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        }
    }

    /// Serializes the counters as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
