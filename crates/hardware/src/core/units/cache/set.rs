//! Cache sets and lines.
//!
//! A [`CacheSet`] always holds exactly `ways` lines. Lines are addressed by way
//! index; the recency order is a permutation of those way indices, most recent
//! first, so it can never reference a line the set does not hold.

use crate::common::CoherenceState;

/// Cache line entry: a tag and its coherence state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CacheLine {
    /// Tag bits of the cached address.
    pub tag: u64,
    /// Coherence state of the line.
    pub state: CoherenceState,
}

impl CacheLine {
    /// Creates a line.
    pub const fn new(tag: u64, state: CoherenceState) -> Self {
        Self { tag, state }
    }
}

/// One associative set.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    /// Way indices, index 0 is MRU.
    recency: Vec<usize>,
    /// Bumped on every replacement; invalidates outstanding victim handles.
    epoch: u64,
}

impl CacheSet {
    /// Creates a full set of `ways` Invalid placeholder lines tagged `0..ways`.
    ///
    /// Placeholders are promoted in tag order, so the highest tag starts at MRU
    /// and tag 0 is the first LRU victim.
    pub(crate) fn with_placeholders(ways: usize) -> Self {
        let lines = (0..ways as u64)
            .map(|tag| CacheLine::new(tag, CoherenceState::Invalid))
            .collect();
        let recency = (0..ways).rev().collect();
        Self {
            lines,
            recency,
            epoch: 0,
        }
    }

    /// Associativity of the set.
    #[inline]
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Resident lines indexed by way.
    #[inline]
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Finds the way holding `tag`.
    #[inline]
    pub fn way_of(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.tag == tag)
    }

    /// Way at the tail of the recency order.
    #[inline]
    pub fn lru_way(&self) -> usize {
        self.recency[self.recency.len() - 1]
    }

    /// Resident tags from most to least recently used.
    pub fn recency_order(&self) -> Vec<u64> {
        self.recency.iter().map(|&way| self.lines[way].tag).collect()
    }

    pub(crate) const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn line_mut(&mut self, way: usize) -> &mut CacheLine {
        &mut self.lines[way]
    }

    /// Moves `way` to the MRU position.
    pub(crate) fn promote(&mut self, way: usize) {
        if let Some(pos) = self.recency.iter().position(|&w| w == way) {
            let _ = self.recency.remove(pos);
        }
        self.recency.insert(0, way);
    }

    /// Overwrites the line in `way` and makes it MRU. Returns the evicted line.
    pub(crate) fn replace(&mut self, way: usize, line: CacheLine) -> CacheLine {
        let evicted = std::mem::replace(&mut self.lines[way], line);
        self.promote(way);
        self.epoch = self.epoch.wrapping_add(1);
        evicted
    }
}
