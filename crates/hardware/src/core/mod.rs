//! Core cache model.
//!
//! Holds the modelled hardware units; the driver that feeds them lives in
//! [`crate::sim`].

/// Cache engine and prefetch units.
pub mod units;

pub use self::units::cache::SetCache;
