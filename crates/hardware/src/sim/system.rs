//! Reference access driver: owns the access path and the prefetcher side-by-side.
//!
//! The prefetcher needs `&mut` access to the path it issues reads through while
//! the driver is itself being driven. Keeping the [`AccessPath`] and the
//! prefetcher as separate fields lets both be borrowed at once, and the path
//! handed to the prefetcher has no prefetcher of its own, so a speculative read
//! can never trigger another round of prefetching.

use tracing::{debug, trace};

use super::layout::AddressLayout;
use crate::common::error::ConfigResult;
use crate::common::{CoherenceState, MemAccess, Provenance};
use crate::config::Config;
use crate::core::units::cache::{CacheLine, SetCache};
use crate::core::units::prefetch::{self, AccessDriver, NullPrefetcher, Prefetcher};
use crate::stats::CacheStats;

/// Result of resolving one access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// The line was resident and valid.
    pub hit: bool,
    /// Line replaced by the fill, if the access caused a replacement.
    pub evicted: Option<CacheLine>,
    /// Speculative reads the prefetcher issued in response (always 0 for
    /// speculative accesses).
    pub prefetches: usize,
}

impl AccessOutcome {
    /// Returns `true` if the access evicted a dirty line.
    pub fn wrote_back(&self) -> bool {
        self.evicted.is_some_and(|line| line.state.is_dirty())
    }
}

/// Decode, lookup and replacement for single accesses. Never prefetches.
#[derive(Debug)]
pub struct AccessPath {
    cache: SetCache,
    layout: AddressLayout,
    stats: CacheStats,
}

impl AccessPath {
    /// Wraps `cache` with lines of `line_bytes` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `line_bytes` is not a power of two.
    pub fn new(cache: SetCache, line_bytes: u64) -> Self {
        let layout = AddressLayout::new(line_bytes, cache.num_sets());
        Self {
            cache,
            layout,
            stats: CacheStats::default(),
        }
    }

    /// The cache engine.
    pub const fn cache(&self) -> &SetCache {
        &self.cache
    }

    /// Address decoder.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Counters so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Resolves `access` against the cache.
    ///
    /// Valid resident lines hit and are promoted; a write hit leaves the line
    /// Modified. A resident but Invalid line is revived in place. Anything else
    /// replaces a victim, filling Modified for writes and Exclusive for reads.
    pub fn resolve(&mut self, access: MemAccess) -> AccessOutcome {
        let (set, tag) = self.layout.decode(access.address);
        let write = access.kind.is_write();
        let fill_state = if write {
            CoherenceState::Modified
        } else {
            CoherenceState::Exclusive
        };

        let (hit, evicted) = match self.cache.find_tag(set, tag) {
            Some(state) if state.is_valid() => {
                self.cache.update_lru(set, tag);
                if write {
                    let _ = self.cache.change_state(set, tag, CoherenceState::Modified);
                }
                (true, None)
            }
            Some(_) => {
                let _ = self.cache.change_state(set, tag, fill_state);
                self.cache.update_lru(set, tag);
                (false, None)
            }
            None => {
                let victim = self.cache.check_writeback(set);
                if victim.needs_writeback() {
                    self.stats.writebacks += 1;
                    debug!(
                        set,
                        tag = victim.tag(),
                        address = self.layout.line_address(set, victim.tag()),
                        "writeback"
                    );
                }
                let evicted = self.cache.insert_line(victim, tag, fill_state);
                (false, Some(evicted))
            }
        };

        self.count(access, hit);
        trace!(%access, set, tag, hit, "access resolved");

        AccessOutcome {
            hit,
            evicted,
            prefetches: 0,
        }
    }

    fn count(&mut self, access: MemAccess, hit: bool) {
        match access.provenance {
            Provenance::Demand => {
                if access.kind.is_write() {
                    self.stats.writes += 1;
                } else {
                    self.stats.reads += 1;
                }
                if hit {
                    self.stats.hits += 1;
                } else {
                    self.stats.misses += 1;
                }
            }
            Provenance::Speculative => {
                if hit {
                    self.stats.prefetch_redundant += 1;
                } else {
                    self.stats.prefetch_fills += 1;
                }
            }
        }
    }
}

impl AccessDriver for AccessPath {
    fn mem_access(&mut self, access: MemAccess) {
        let _ = self.resolve(access);
    }

    fn set_shift(&self) -> u32 {
        self.layout.set_shift()
    }

    fn line_mask(&self) -> u64 {
        self.layout.line_mask()
    }
}

/// Single-cache system: access path plus the run's prefetch policy.
#[derive(Debug)]
pub struct CacheSystem {
    path: AccessPath,
    prefetcher: Box<dyn Prefetcher>,
}

impl CacheSystem {
    /// Creates a system from an already built cache and prefetcher.
    ///
    /// # Panics
    ///
    /// Panics if `line_bytes` is not a power of two.
    pub fn new(cache: SetCache, line_bytes: u64, prefetcher: Box<dyn Prefetcher>) -> Self {
        Self {
            path: AccessPath::new(cache, line_bytes),
            prefetcher,
        }
    }

    /// Creates a system without a prefetcher.
    pub fn without_prefetch(cache: SetCache, line_bytes: u64) -> Self {
        Self::new(cache, line_bytes, Box::new(NullPrefetcher))
    }

    /// Validates `config` and builds the system it describes.
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        config.validate()?;
        let cache = SetCache::from_config(&config.cache)?;
        let prefetcher = prefetch::build(&config.prefetch);
        Ok(Self::new(cache, config.cache.line_bytes, prefetcher))
    }

    /// Resolves `access`, then runs the prefetcher if it is a demand access.
    pub fn access(&mut self, access: MemAccess) -> AccessOutcome {
        let mut outcome = self.path.resolve(access);
        if access.is_speculative() {
            return outcome;
        }

        let driver: &mut dyn AccessDriver = &mut self.path;
        outcome.prefetches = if outcome.hit {
            self.prefetcher
                .prefetch_on_hit(access.address, access.thread_id, driver)
        } else {
            self.prefetcher
                .prefetch_on_miss(access.address, access.thread_id, driver)
        };
        self.path.stats.prefetches_issued += outcome.prefetches as u64;
        outcome
    }

    /// Demand read of `address` by `thread_id`.
    pub fn read(&mut self, address: u64, thread_id: u32) -> AccessOutcome {
        self.access(MemAccess::read(address, thread_id))
    }

    /// Demand write of `address` by `thread_id`.
    pub fn write(&mut self, address: u64, thread_id: u32) -> AccessOutcome {
        self.access(MemAccess::write(address, thread_id))
    }

    /// Replays every access of `trace` in order and returns the final counters.
    pub fn run<I>(&mut self, trace: I) -> &CacheStats
    where
        I: IntoIterator<Item = MemAccess>,
    {
        for access in trace {
            let _ = self.access(access);
        }
        self.path.stats()
    }

    /// The cache engine.
    pub const fn cache(&self) -> &SetCache {
        self.path.cache()
    }

    /// Address decoder.
    pub const fn layout(&self) -> &AddressLayout {
        self.path.layout()
    }

    /// Counters so far.
    pub const fn stats(&self) -> &CacheStats {
        self.path.stats()
    }

    /// The active prefetch policy.
    pub fn prefetcher(&self) -> &dyn Prefetcher {
        &*self.prefetcher
    }
}

impl AccessDriver for CacheSystem {
    fn mem_access(&mut self, access: MemAccess) {
        let _ = self.access(access);
    }

    fn set_shift(&self) -> u32 {
        self.path.set_shift()
    }

    fn line_mask(&self) -> u64 {
        self.path.line_mask()
    }
}
