use cachesim_core::config::{PrefetchConfig, Prefetcher as PrefetcherType, ReplacementPolicy};
use cachesim_core::core::units::prefetch;
use cachesim_core::{CacheSystem, SetCache};
use std::sync::Once;

/// Line size used by every harness-built cache.
pub const LINE_BYTES: u64 = 64;

static TRACING: Once = Once::new();

/// Installs a test-friendly `tracing` subscriber once per test binary.
///
/// Output is filtered by `RUST_LOG` and captured by the test runner.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// The 8-line, 2-way cache used by the worked examples: 4 sets of tags `{0, 1}`.
pub fn scenario_cache(policy: ReplacementPolicy) -> SetCache {
    init_tracing();
    SetCache::new(8, 2, policy)
}

/// A cache system over `num_lines` / `ways` with 64-byte lines.
pub fn system(
    num_lines: usize,
    ways: usize,
    policy: ReplacementPolicy,
    prefetcher: PrefetcherType,
) -> CacheSystem {
    init_tracing();
    let cache = SetCache::new(num_lines, ways, policy);
    let config = PrefetchConfig {
        degree: 3,
        ..PrefetchConfig::with_prefetcher(prefetcher)
    };
    CacheSystem::new(cache, LINE_BYTES, prefetch::build(&config))
}

/// Byte address of `(set, tag)` in a cache with `num_sets` sets of 64-byte lines.
pub const fn addr(num_sets: u64, set: u64, tag: u64) -> u64 {
    (tag * num_sets + set) * LINE_BYTES
}
