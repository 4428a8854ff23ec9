//! Set-Associative Cache Engine.
//!
//! This module implements the storage and eviction engine of a set-associative
//! cache. Every set is permanently full: it is created holding placeholder lines
//! and every fill replaces a victim chosen by the run-wide replacement policy.
//!
//! A replacement is split in two steps so the driver can perform the writeback
//! in between:
//!
//! 1. [`SetCache::check_writeback`] selects the victim and returns a [`Victim`] handle.
//! 2. [`SetCache::insert_line`] consumes that handle and replaces exactly that line.
//!
//! The handle is the only way to commit a replacement, so the line whose
//! dirtiness was checked is always the line that gets evicted, even under the
//! random policy.

/// Cache replacement policy implementations (LRU, Random).
pub mod policies;

/// Cache sets and lines.
pub mod set;

use tracing::debug;

use self::policies::{LruPolicy, RandomPolicy, ReplacementPolicy};
pub use self::set::{CacheLine, CacheSet};
use crate::common::CoherenceState;
use crate::common::error::ConfigResult;
use crate::config::{CacheConfig, ReplacementPolicy as PolicyType};

/// Eviction candidate selected by [`SetCache::check_writeback`].
///
/// Not `Clone`: a victim can be committed at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a victim does nothing unless passed to SetCache::insert_line"]
pub struct Victim {
    set: usize,
    way: usize,
    line: CacheLine,
    epoch: u64,
}

impl Victim {
    /// Set index the victim belongs to.
    pub const fn set(&self) -> usize {
        self.set
    }

    /// Tag of the line that will be evicted.
    pub const fn tag(&self) -> u64 {
        self.line.tag
    }

    /// State of the line when it was selected.
    pub const fn state(&self) -> CoherenceState {
        self.line.state
    }

    /// Returns `true` if the line is Modified or Owned and must be flushed before reuse.
    pub const fn needs_writeback(&self) -> bool {
        self.line.state.is_dirty()
    }
}

/// Set-associative cache engine.
///
/// Geometry is fixed at construction: `num_lines / associativity` sets of
/// `associativity` lines each.
#[derive(Debug)]
pub struct SetCache {
    sets: Vec<CacheSet>,
    associativity: usize,
    policy_kind: PolicyType,
    policy: Box<dyn ReplacementPolicy>,
}

impl SetCache {
    /// Creates a cache with the default random seed.
    ///
    /// # Panics
    ///
    /// Panics if `associativity` is zero or does not divide `num_lines`. Use
    /// [`SetCache::from_config`] to get an error instead.
    pub fn new(num_lines: usize, associativity: usize, policy: PolicyType) -> Self {
        Self::with_seed(num_lines, associativity, policy, CacheConfig::default().seed)
    }

    /// Creates a cache whose random policy (if selected) starts from `seed`.
    ///
    /// # Arguments
    ///
    /// * `num_lines` - Total number of cache lines.
    /// * `associativity` - Ways per set.
    /// * `policy` - Replacement policy applied to every set.
    /// * `seed` - Generator seed for [`PolicyType::Random`]; ignored by LRU.
    ///
    /// # Panics
    ///
    /// Panics if `associativity` is zero or does not divide `num_lines`.
    pub fn with_seed(
        num_lines: usize,
        associativity: usize,
        policy: PolicyType,
        seed: u64,
    ) -> Self {
        assert!(associativity > 0, "cache associativity must be non-zero");
        assert!(
            num_lines % associativity == 0,
            "{num_lines} lines cannot be split into sets of {associativity} ways"
        );

        let num_sets = num_lines / associativity;
        let sets = (0..num_sets)
            .map(|_| CacheSet::with_placeholders(associativity))
            .collect();
        let boxed: Box<dyn ReplacementPolicy> = match policy {
            PolicyType::Lru => Box::new(LruPolicy::new()),
            PolicyType::Random => Box::new(RandomPolicy::new(seed)),
        };

        debug!(num_sets, associativity, ?policy, "cache engine created");

        Self {
            sets,
            associativity,
            policy_kind: policy,
            policy: boxed,
        }
    }

    /// Validates `config` and builds the cache it describes.
    pub fn from_config(config: &CacheConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::with_seed(
            config.num_lines,
            config.associativity,
            config.policy,
            config.seed,
        ))
    }

    /// Number of sets.
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Ways per set.
    #[inline]
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Replacement policy selected at construction.
    #[inline]
    pub const fn policy(&self) -> PolicyType {
        self.policy_kind
    }

    /// Read-only view of a set.
    #[inline]
    pub fn set(&self, set: usize) -> &CacheSet {
        &self.sets[set]
    }

    /// Resident lines of a set, indexed by way.
    pub fn lines(&self, set: usize) -> &[CacheLine] {
        self.sets[set].lines()
    }

    /// Resident tags of a set from most to least recently used.
    pub fn recency_order(&self, set: usize) -> Vec<u64> {
        self.sets[set].recency_order()
    }

    /// Resident tags of a set in way order.
    pub fn resident_tags(&self, set: usize) -> Vec<u64> {
        self.sets[set].lines().iter().map(|line| line.tag).collect()
    }

    /// Looks up `tag` in `set`.
    ///
    /// # Returns
    ///
    /// `Some(state)` if the tag is resident (the state may itself be Invalid),
    /// `None` if it is not.
    pub fn find_tag(&self, set: usize, tag: u64) -> Option<CoherenceState> {
        let s = &self.sets[set];
        s.way_of(tag).map(|way| s.lines()[way].state)
    }

    /// Looks up `tag` in `set`, reporting an absent tag as Invalid.
    ///
    /// Callers that must tell "absent" from "resident but Invalid" use
    /// [`SetCache::find_tag`].
    pub fn state(&self, set: usize, tag: u64) -> CoherenceState {
        self.find_tag(set, tag).unwrap_or(CoherenceState::Invalid)
    }

    /// Overwrites the state of the resident line tagged `tag`.
    ///
    /// # Returns
    ///
    /// `true` if the line was resident and updated, `false` if the tag is absent
    /// (nothing changes).
    pub fn change_state(&mut self, set: usize, tag: u64, state: CoherenceState) -> bool {
        let s = &mut self.sets[set];
        match s.way_of(tag) {
            Some(way) => {
                s.line_mut(way).state = state;
                true
            }
            None => false,
        }
    }

    /// Moves `tag` to the most-recently-used position of `set`.
    ///
    /// No-op under the random policy, which does not track recency.
    ///
    /// # Panics
    ///
    /// Under LRU, panics if `tag` is not resident in `set`.
    pub fn update_lru(&mut self, set: usize, tag: u64) {
        if !self.policy.tracks_recency() {
            return;
        }
        let s = &mut self.sets[set];
        let Some(way) = s.way_of(tag) else {
            panic!("update_lru: tag {tag:#x} is not resident in set {set}");
        };
        s.promote(way);
    }

    /// Selects the line a fill of `set` would evict, without evicting it.
    ///
    /// Under LRU this is the tail of the recency order; under the random policy
    /// a uniformly drawn resident line. Ask the returned [`Victim`] whether a
    /// writeback is needed, then pass it to [`SetCache::insert_line`].
    pub fn check_writeback(&mut self, set: usize) -> Victim {
        let s = &self.sets[set];
        let way = self.policy.select_victim(s);
        Victim {
            set,
            way,
            line: s.lines()[way],
            epoch: s.epoch(),
        }
    }

    /// Replaces the line chosen by `victim` with `(tag, state)` at the MRU position.
    ///
    /// # Returns
    ///
    /// The evicted line, with its state as of the replacement.
    ///
    /// # Panics
    ///
    /// Panics if the set was modified by another replacement since `victim` was
    /// selected, or if `tag` is already resident in another way of the set.
    pub fn insert_line(&mut self, victim: Victim, tag: u64, state: CoherenceState) -> CacheLine {
        let s = &mut self.sets[victim.set];
        assert!(
            s.epoch() == victim.epoch,
            "insert_line: stale victim for set {} (tag {:#x})",
            victim.set,
            victim.line.tag
        );
        if let Some(way) = s.way_of(tag) {
            assert!(
                way == victim.way,
                "insert_line: tag {tag:#x} is already resident in set {}",
                victim.set
            );
        }

        let evicted = s.replace(victim.way, CacheLine::new(tag, state));
        debug!(
            set = victim.set,
            evicted = evicted.tag,
            dirty = evicted.state.is_dirty(),
            inserted = tag,
            %state,
            "line replaced"
        );
        evicted
    }

    /// Selects a victim and replaces it in one step.
    ///
    /// Convenience for callers that have no side effect to perform between the
    /// writeback check and the fill.
    pub fn fill(&mut self, set: usize, tag: u64, state: CoherenceState) -> CacheLine {
        let victim = self.check_writeback(set);
        self.insert_line(victim, tag, state)
    }
}
