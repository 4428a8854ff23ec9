//! Set-associative cache simulator library.
//!
//! This crate models a set-associative hardware cache for offline evaluation of
//! memory-access traces:
//! 1. **Engine:** Fixed-geometry sets tracking tag residency, coherence state and recency.
//! 2. **Replacement:** LRU or uniform-random victim selection, chosen once per run.
//! 3. **Prefetch:** None, adjacent-line, sequential and address-correlation policies.
//! 4. **Simulation:** Address decoding, the access driver, configuration and statistics.

/// Common types (coherence state, access events, errors).
pub mod common;
/// Simulator configuration (defaults, enums, JSON loading).
pub mod config;
/// Cache engine and prefetch units.
pub mod core;
/// Reference access driver.
pub mod sim;
/// Access statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Cache storage/eviction engine.
pub use crate::core::SetCache;
/// Cache plus prefetcher; construct with `CacheSystem::from_config`.
pub use crate::sim::CacheSystem;
