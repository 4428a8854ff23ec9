//! Simulation driver.
//!
//! Provides the reference [`AccessDriver`](crate::core::units::prefetch::AccessDriver):
//! it decodes addresses, runs the cache engine's lookup and replacement
//! sequence, and invokes the prefetch policy for demand accesses only.

/// Address field decoding (offset, set index, tag).
pub mod layout;

/// Cache system driving the engine and the prefetcher.
pub mod system;

pub use self::layout::AddressLayout;
pub use self::system::{AccessOutcome, AccessPath, CacheSystem};
