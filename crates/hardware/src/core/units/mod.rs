//! Cache units.
//!
//! This module contains the storage/eviction engine and the prefetch
//! policies that surround it.

/// Set-associative cache engine with replacement policies.
pub mod cache;

/// Hardware prefetcher implementations (adjacent, sequential, best-effort).
pub mod prefetch;
