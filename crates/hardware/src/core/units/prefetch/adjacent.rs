//! Adjacent-Line Prefetcher.
//!
//! Fetches the cache line immediately after the accessed one, on hits and
//! misses alike. The neighbour is one set-index step away: `address + (1 << SET_SHIFT)`.

use super::{AccessDriver, Prefetcher, issue};

/// Adjacent-line prefetcher. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdjacentPrefetcher;

impl AdjacentPrefetcher {
    fn prefetch(address: u64, thread_id: u32, driver: &mut dyn AccessDriver) -> usize {
        let target = address.wrapping_add(1u64 << driver.set_shift());
        issue(driver, target, thread_id);
        1
    }
}

impl Prefetcher for AdjacentPrefetcher {
    fn prefetch_on_miss(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        Self::prefetch(address, thread_id, driver)
    }

    fn prefetch_on_hit(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        Self::prefetch(address, thread_id, driver)
    }
}
