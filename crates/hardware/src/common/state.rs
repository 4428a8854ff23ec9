//! Coherence State.
//!
//! Per-line coherence marker stored by the cache engine. Only the state is
//! modelled; no protocol messages are exchanged between simulated cores.

use std::fmt;

/// MOESI coherence state of a cache line.
///
/// The engine compares states by equality and asks only [`CoherenceState::is_dirty`];
/// transitions are decided by the access driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CoherenceState {
    /// Line holds no usable data. Placeholder lines start here.
    #[default]
    Invalid,
    /// Clean copy that may also be held by other caches.
    Shared,
    /// Clean copy held only by this cache.
    Exclusive,
    /// Dirty copy that other caches may share; this cache must write it back.
    Owned,
    /// Dirty copy held only by this cache.
    Modified,
}

impl CoherenceState {
    /// Returns `true` if evicting a line in this state requires a writeback.
    #[inline]
    pub const fn is_dirty(self) -> bool {
        matches!(self, Self::Modified | Self::Owned)
    }

    /// Returns `true` for every state except [`CoherenceState::Invalid`].
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for CoherenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Invalid => "I",
            Self::Shared => "S",
            Self::Exclusive => "E",
            Self::Owned => "O",
            Self::Modified => "M",
        };
        f.write_str(s)
    }
}
