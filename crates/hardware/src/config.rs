//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** Baseline geometry and prefetcher constants.
//! 2. **Structures:** Cache geometry/policy and prefetcher sections.
//! 3. **Enums:** Replacement policy and prefetcher selection.
//! 4. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! The replacement policy and prefetcher are chosen once per run and applied to
//! every set and every access.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, ConfigResult};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default total number of cache lines (32 KiB of 64-byte lines).
    pub const NUM_LINES: usize = 512;

    /// Default associativity (8 ways per set).
    pub const ASSOCIATIVITY: usize = 8;

    /// Default cache line size in bytes.
    pub const LINE_BYTES: u64 = 64;

    /// Default seed for the random replacement generator.
    ///
    /// Must be non-zero: a zero xorshift state never leaves zero.
    pub const SEED: u64 = 0x2545_F491_4F6C_DD1D;

    /// Default sequential prefetch degree (lines per trigger).
    pub const PREFETCH_DEGREE: usize = 1;

    /// Default number of correlated successors the best-effort prefetcher issues.
    pub const BEST_EFFORT_FANOUT: usize = 4;

    /// Default depth of the best-effort prefetcher's sequential component.
    pub const BEST_EFFORT_DEGREE: usize = 9;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which line to evict when a new
/// line is installed in a set. Every set is permanently full, so every fill
/// is a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the tail of the set's recency order.
    #[default]
    #[serde(alias = "LRU", alias = "lru")]
    Lru,
    /// Random replacement policy.
    ///
    /// Evicts a uniformly random resident line. Hits do not update recency.
    #[serde(alias = "RANDOM", alias = "random")]
    Random,
}

/// Prefetch policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Prefetcher {
    /// No prefetching.
    #[default]
    #[serde(alias = "none", alias = "Null")]
    None,
    /// Prefetches the adjacent cache line on every access.
    #[serde(alias = "adjacent", alias = "Adj")]
    Adjacent,
    /// Prefetches the next `degree` cache lines on every access.
    #[serde(alias = "sequential", alias = "Seq")]
    Sequential,
    /// Address-correlation prefetcher backed by a sequential component.
    #[serde(alias = "best_effort", alias = "BestEffortPrefetch")]
    BestEffort,
}

impl Prefetcher {
    /// Short human-readable name, used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Adjacent => "adjacent",
            Self::Sequential => "sequential",
            Self::BestEffort => "best-effort",
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.cache.num_lines, 512);
/// assert_eq!(config.cache.num_sets(), 64);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::{Config, Prefetcher, ReplacementPolicy};
///
/// let json = r#"{
///     "cache": {
///         "num_lines": 8,
///         "associativity": 2,
///         "line_bytes": 64,
///         "policy": "Random",
///         "seed": 7
///     },
///     "prefetch": {
///         "prefetcher": "Sequential",
///         "degree": 3
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.num_sets(), 4);
/// assert_eq!(config.cache.policy, ReplacementPolicy::Random);
/// assert_eq!(config.prefetch.prefetcher, Prefetcher::Sequential);
/// assert_eq!(config.prefetch.best_effort_fanout, 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache geometry and replacement policy.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Prefetch policy.
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Config {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_json(&text)
    }

    /// Checks every section for values the engine would reject.
    pub fn validate(&self) -> ConfigResult<()> {
        self.cache.validate()?;
        self.prefetch.validate()
    }
}

/// Cache geometry and replacement configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total number of cache lines.
    #[serde(default = "CacheConfig::default_num_lines")]
    pub num_lines: usize,

    /// Ways per set.
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: usize,

    /// Cache line size in bytes (power of two).
    #[serde(default = "CacheConfig::default_line_bytes")]
    pub line_bytes: u64,

    /// Replacement policy applied to every set.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Seed for the random replacement generator.
    #[serde(default = "CacheConfig::default_seed")]
    pub seed: u64,
}

impl CacheConfig {
    fn default_num_lines() -> usize {
        defaults::NUM_LINES
    }

    fn default_associativity() -> usize {
        defaults::ASSOCIATIVITY
    }

    fn default_line_bytes() -> u64 {
        defaults::LINE_BYTES
    }

    fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Number of sets implied by the geometry.
    ///
    /// Returns 0 for a zero associativity; [`CacheConfig::validate`] rejects that case.
    pub const fn num_sets(&self) -> usize {
        if self.associativity == 0 {
            0
        } else {
            self.num_lines / self.associativity
        }
    }

    /// Checks the geometry.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_lines == 0 {
            return Err(ConfigError::ZeroLines);
        }
        if self.associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self.num_lines % self.associativity != 0 {
            return Err(ConfigError::IndivisibleGeometry {
                num_lines: self.num_lines,
                associativity: self.associativity,
            });
        }
        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::LineSizeNotPowerOfTwo(self.line_bytes));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            num_lines: defaults::NUM_LINES,
            associativity: defaults::ASSOCIATIVITY,
            line_bytes: defaults::LINE_BYTES,
            policy: ReplacementPolicy::default(),
            seed: defaults::SEED,
        }
    }
}

/// Prefetcher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PrefetchConfig {
    /// Prefetch policy.
    #[serde(default)]
    pub prefetcher: Prefetcher,

    /// Lines fetched ahead by the sequential prefetcher.
    #[serde(default = "PrefetchConfig::default_degree")]
    pub degree: usize,

    /// Maximum correlated successors issued by the best-effort prefetcher.
    #[serde(default = "PrefetchConfig::default_best_effort_fanout")]
    pub best_effort_fanout: usize,

    /// Lines fetched ahead by the best-effort prefetcher's sequential component.
    #[serde(default = "PrefetchConfig::default_best_effort_degree")]
    pub best_effort_degree: usize,
}

impl PrefetchConfig {
    fn default_degree() -> usize {
        defaults::PREFETCH_DEGREE
    }

    fn default_best_effort_fanout() -> usize {
        defaults::BEST_EFFORT_FANOUT
    }

    fn default_best_effort_degree() -> usize {
        defaults::BEST_EFFORT_DEGREE
    }

    /// Creates a configuration selecting `prefetcher` with default parameters.
    pub fn with_prefetcher(prefetcher: Prefetcher) -> Self {
        Self {
            prefetcher,
            ..Self::default()
        }
    }

    /// Checks the degree of the selected prefetcher.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.prefetcher {
            Prefetcher::Sequential if self.degree == 0 => {
                Err(ConfigError::ZeroPrefetchDegree(Prefetcher::Sequential.name()))
            }
            _ => Ok(()),
        }
    }
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            prefetcher: Prefetcher::default(),
            degree: defaults::PREFETCH_DEGREE,
            best_effort_fanout: defaults::BEST_EFFORT_FANOUT,
            best_effort_degree: defaults::BEST_EFFORT_DEGREE,
        }
    }
}
