//! Hardware Prefetcher implementations.
//!
//! This module contains the interface and implementations of the prefetch
//! policies. A prefetcher reacts to a resolved demand access by issuing further
//! speculative reads back through the [`AccessDriver`] that resolved it.
//!
//! Every read a prefetcher issues is tagged [`Provenance::Speculative`]; drivers
//! must not run a prefetcher for such an access, which bounds prefetch chains
//! to one level.
//!
//! [`Provenance::Speculative`]: crate::common::Provenance::Speculative

/// Adjacent-line prefetcher.
pub mod adjacent;

/// Address-correlation prefetcher with a sequential fallback.
pub mod best_effort;

/// Fixed-depth sequential prefetcher.
pub mod sequential;

use std::fmt;

use tracing::{debug, trace};

pub use self::adjacent::AdjacentPrefetcher;
pub use self::best_effort::{BestEffortPrefetcher, CorrelationTable};
pub use self::sequential::SequentialPrefetcher;
use crate::common::MemAccess;
use crate::config::{PrefetchConfig, Prefetcher as PrefetcherType};

/// The access path a prefetcher issues its reads through.
///
/// Implemented by the simulation driver. The driver also exposes the address
/// layout constants prefetchers use to compute neighbouring lines.
pub trait AccessDriver {
    /// Resolves one access against the cache.
    ///
    /// Implementations must not invoke a prefetcher when
    /// [`MemAccess::is_speculative`] is true.
    fn mem_access(&mut self, access: MemAccess);

    /// Bit offset of the set-index field (the number of line-offset bits).
    fn set_shift(&self) -> u32;

    /// Mask covering the byte offset within a cache line.
    fn line_mask(&self) -> u64;

    /// Size of a cache line in bytes.
    fn line_bytes(&self) -> u64 {
        self.line_mask() + 1
    }
}

/// Trait for prefetch policies.
///
/// Both hooks return the number of speculative reads they issued.
pub trait Prefetcher: Send + Sync + fmt::Debug {
    /// Reacts to a demand miss on `address`.
    ///
    /// # Arguments
    ///
    /// * `address` - The byte address that missed.
    /// * `thread_id` - Simulated thread that issued the access.
    /// * `driver` - Access path for the speculative reads.
    fn prefetch_on_miss(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize;

    /// Reacts to a demand hit on `address`.
    fn prefetch_on_hit(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize;
}

/// Issues one speculative read.
fn issue(driver: &mut dyn AccessDriver, address: u64, thread_id: u32) {
    trace!(address, thread_id, "prefetch issued");
    driver.mem_access(MemAccess::prefetch(address, thread_id));
}

/// Prefetcher that never issues anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPrefetcher;

impl Prefetcher for NullPrefetcher {
    fn prefetch_on_miss(&mut self, _: u64, _: u32, _: &mut dyn AccessDriver) -> usize {
        0
    }

    fn prefetch_on_hit(&mut self, _: u64, _: u32, _: &mut dyn AccessDriver) -> usize {
        0
    }
}

/// Builds the prefetcher selected by `config`.
///
/// A zero sequential degree is clamped to 1; [`PrefetchConfig::validate`]
/// reports it as an error for callers that want to reject it instead.
pub fn build(config: &PrefetchConfig) -> Box<dyn Prefetcher> {
    debug!(prefetcher = config.prefetcher.name(), "prefetcher selected");
    match config.prefetcher {
        PrefetcherType::None => Box::new(NullPrefetcher),
        PrefetcherType::Adjacent => Box::new(AdjacentPrefetcher),
        PrefetcherType::Sequential => Box::new(SequentialPrefetcher::new(config.degree.max(1))),
        PrefetcherType::BestEffort => Box::new(BestEffortPrefetcher::with_params(
            config.best_effort_fanout,
            config.best_effort_degree,
        )),
    }
}
