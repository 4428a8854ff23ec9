//! Memory Access Events.
//!
//! This module defines the classification of memory accesses flowing into the cache model.
//! These types are used for the following:
//! 1. **State Transitions:** Reads fill lines clean, writes leave them Modified.
//! 2. **Prefetch Bounding:** Speculative accesses never re-trigger a prefetcher.
//! 3. **Statistics Tracking:** Separating demand traffic from prefetch traffic.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    ///
    /// A write that hits or fills a line leaves it in the Modified state.
    Write,
}

impl AccessType {
    /// Decodes the single-character operation code used by trace formats (`R` / `W`).
    ///
    /// Returns `None` for any other character.
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'R' | 'r' => Some(Self::Read),
            'W' | 'w' => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Where an access came from.
///
/// Carried explicitly on every access so the driver can refuse to run a
/// prefetcher for an access that a prefetcher issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Provenance {
    /// A real access from the trace.
    #[default]
    Demand,
    /// An access issued by a prefetch policy.
    Speculative,
}

/// A single memory access event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemAccess {
    /// Byte address being accessed.
    pub address: u64,
    /// Read or write.
    pub kind: AccessType,
    /// Simulated hardware thread that issued the access.
    pub thread_id: u32,
    /// Demand or speculative.
    pub provenance: Provenance,
}

impl MemAccess {
    /// Creates a demand read.
    pub const fn read(address: u64, thread_id: u32) -> Self {
        Self {
            address,
            kind: AccessType::Read,
            thread_id,
            provenance: Provenance::Demand,
        }
    }

    /// Creates a demand write.
    pub const fn write(address: u64, thread_id: u32) -> Self {
        Self {
            address,
            kind: AccessType::Write,
            thread_id,
            provenance: Provenance::Demand,
        }
    }

    /// Creates the speculative read a prefetcher issues for `address`.
    pub const fn prefetch(address: u64, thread_id: u32) -> Self {
        Self {
            address,
            kind: AccessType::Read,
            thread_id,
            provenance: Provenance::Speculative,
        }
    }

    /// Returns `true` if a prefetcher issued this access.
    #[inline]
    pub const fn is_speculative(&self) -> bool {
        matches!(self.provenance, Provenance::Speculative)
    }
}

impl fmt::Display for MemAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            AccessType::Read => 'R',
            AccessType::Write => 'W',
        };
        let tag = if self.is_speculative() { " (prefetch)" } else { "" };
        write!(f, "{op} {:#x} t{}{tag}", self.address, self.thread_id)
    }
}
