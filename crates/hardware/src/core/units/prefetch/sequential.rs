//! Sequential Prefetcher.
//!
//! A spatial prefetcher that fetches the next `n` cache lines whenever a cache
//! access occurs, regardless of hit or miss. The access address is not aligned
//! down first: line `i` is fetched at `address + i * (LINE_MASK + 1)`.

use super::{AccessDriver, Prefetcher, issue};

/// Sequential prefetcher state.
#[derive(Debug, Clone, Copy)]
pub struct SequentialPrefetcher {
    /// Number of subsequent lines to prefetch.
    degree: usize,
}

impl SequentialPrefetcher {
    /// Creates a prefetcher fetching `degree` lines ahead.
    pub const fn new(degree: usize) -> Self {
        Self { degree }
    }

    /// Lines fetched per trigger.
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Issues the forward reads and returns how many were issued.
    pub(crate) fn run(&self, address: u64, thread_id: u32, driver: &mut dyn AccessDriver) -> usize {
        let line_bytes = driver.line_bytes();
        for i in 1..=self.degree as u64 {
            issue(driver, address.wrapping_add(i * line_bytes), thread_id);
        }
        self.degree
    }
}

impl Prefetcher for SequentialPrefetcher {
    fn prefetch_on_miss(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        self.run(address, thread_id, driver)
    }

    fn prefetch_on_hit(
        &mut self,
        address: u64,
        thread_id: u32,
        driver: &mut dyn AccessDriver,
    ) -> usize {
        self.run(address, thread_id, driver)
    }
}
