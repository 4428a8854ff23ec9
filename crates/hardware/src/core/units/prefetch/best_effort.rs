//! Best-Effort (Address-Correlation) Prefetcher.
//!
//! Learns which address tends to follow which. Every access records the
//! transition from the previously seen address, then prefetches the most
//! frequent recorded successors of the current address and finally runs a
//! sequential prefetch on top.
//!
//! # Performance
//!
//! - **Time Complexity:** O(K log K) per access, K = distinct successors of the address
//! - **Space Complexity:** unbounded; the table is never pruned
//! - **Best Case:** Irregular but repeating access sequences (pointer chasing over a
//!   fixed structure)
//! - **Worst Case:** Streams of never-repeating addresses (the table only grows)

use std::cmp::Reverse;
use std::collections::HashMap;

use super::{AccessDriver, Prefetcher, SequentialPrefetcher, issue};

/// Default number of correlated successors issued per access.
pub const DEFAULT_FANOUT: usize = 4;

/// Default depth of the sequential component.
pub const DEFAULT_SEQUENTIAL_DEGREE: usize = 9;

/// Occurrence counts of `previous address -> next address` transitions.
#[derive(Debug, Default, Clone)]
pub struct CorrelationTable {
    transitions: HashMap<u64, HashMap<u64, u64>>,
}

impl CorrelationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `to` following `from`.
    pub fn record(&mut self, from: u64, to: u64) {
        *self
            .transitions
            .entry(from)
            .or_default()
            .entry(to)
            .or_insert(0) += 1;
    }

    /// Number of times `to` was recorded after `from`.
    pub fn count(&self, from: u64, to: u64) -> u64 {
        self.transitions
            .get(&from)
            .and_then(|next| next.get(&to))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct successors recorded for `from`.
    pub fn successor_count(&self, from: u64) -> usize {
        self.transitions.get(&from).map_or(0, HashMap::len)
    }

    /// Number of distinct source addresses in the table.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no transition was ever recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// The most frequent successors of `from`, highest count first.
    ///
    /// Returns at most `limit` addresses and never more than were recorded.
    /// Equal counts are ordered by ascending address.
    pub fn top_successors(&self, from: u64, limit: usize) -> Vec<u64> {
        let Some(next) = self.transitions.get(&from) else {
            return Vec::new();
        };
        let mut ranked: Vec<(u64, u64)> = next.iter().map(|(&addr, &n)| (addr, n)).collect();
        ranked.sort_unstable_by_key(|&(addr, n)| (Reverse(n), addr));
        ranked.truncate(limit);
        ranked.into_iter().map(|(addr, _)| addr).collect()
    }
}

/// Best-effort prefetcher state.
#[derive(Debug, Clone)]
pub struct BestEffortPrefetcher {
    table: CorrelationTable,
    /// Last address observed; `None` until the first access.
    previous: Option<u64>,
    fanout: usize,
    sequential: SequentialPrefetcher,
}

impl Default for BestEffortPrefetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BestEffortPrefetcher {
    /// Creates a prefetcher issuing up to 4 correlated and 9 sequential reads.
    pub fn new() -> Self {
        Self::with_params(DEFAULT_FANOUT, DEFAULT_SEQUENTIAL_DEGREE)
    }

    /// Creates a prefetcher with a custom correlated fanout and sequential depth.
    pub fn with_params(fanout: usize, sequential_degree: usize) -> Self {
        Self {
            table: CorrelationTable::new(),
            previous: None,
            fanout,
            sequential: SequentialPrefetcher::new(sequential_degree),
        }
    }

    /// Learned transition counts.
    pub const fn table(&self) -> &CorrelationTable {
        &self.table
    }

    /// Last address observed.
    pub const fn previous(&self) -> Option<u64> {
        self.previous
    }

    /// Learns from `address`, then issues correlated and sequential reads.
    ///
    /// Returns the total number of reads issued, sequential ones included.
    fn react(&mut self, address: u64, thread_id: u32, driver: &mut dyn AccessDriver) -> usize {
        if let Some(prev) = self.previous {
            self.table.record(prev, address);
        }
        self.previous = Some(address);

        let correlated = self.table.top_successors(address, self.fanout);
        for &target in &correlated {
            issue(driver, target, thread_id);
        }
        correlated.len() + self.sequential.run(address, thread_id, driver)
    }
}

impl Prefetcher for BestEffortPrefetcher {
    fn prefetch_on_miss(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        self.react(address, thread_id, driver)
    }

    fn prefetch_on_hit(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        self.react(address, thread_id, driver)
    }
}
