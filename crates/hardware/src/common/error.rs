//! Configuration error definitions.
//!
//! Geometry and configuration problems are reported here when they are caught at the
//! configuration boundary. The same problems reaching the engine constructors
//! directly are precondition violations and abort the run instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a simulator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The cache has no lines at all.
    #[error("cache must contain at least one line")]
    ZeroLines,

    /// Associativity of zero ways.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// The line count is not a whole number of sets.
    #[error("{num_lines} lines cannot be split into sets of {associativity} ways")]
    IndivisibleGeometry {
        /// Total number of cache lines.
        num_lines: usize,
        /// Requested ways per set.
        associativity: usize,
    },

    /// Line size must be a power of two so the offset field is a bit range.
    #[error("line size {0} is not a power of two")]
    LineSizeNotPowerOfTwo(u64),

    /// The sequential prefetch degree is zero.
    #[error("prefetch degree must be at least 1 for the {0} prefetcher")]
    ZeroPrefetchDegree(&'static str),

    /// Reading a configuration file failed.
    #[error("failed to read configuration file '{0}': {1}")]
    Io(PathBuf, #[source] io::Error),

    /// The configuration document is not valid JSON for [`crate::config::Config`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
