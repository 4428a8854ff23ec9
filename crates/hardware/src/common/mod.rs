//! Common types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by the cache engine, the
//! prefetchers and the access driver. It includes:
//! 1. **Coherence State:** The per-line MOESI marker and its dirty predicate.
//! 2. **Memory Access:** Access events tagged with their type, thread and provenance.
//! 3. **Error Handling:** Configuration errors reported at the loading boundary.

/// Memory access event definitions.
pub mod data;

/// Configuration error types.
pub mod error;

/// Coherence state carried by every cache line.
pub mod state;

pub use data::{AccessType, MemAccess, Provenance};
pub use error::{ConfigError, ConfigResult};
pub use state::CoherenceState;
