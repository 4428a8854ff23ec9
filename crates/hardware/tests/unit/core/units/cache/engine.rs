//! Cache Engine (SetCache) Unit Tests.
//!
//! Verifies construction, lookup, state mutation, recency promotion and the
//! select-then-commit replacement sequence. The engine is exercised directly,
//! without an access driver.

use cachesim_core::SetCache;
use cachesim_core::common::{CoherenceState, ConfigError};
use cachesim_core::config::{CacheConfig, ReplacementPolicy};
use cachesim_core::core::units::cache::CacheLine;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::scenario_cache;

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

/// 8 lines, 2 ways → 4 sets, each pre-populated with Invalid placeholders 0 and 1.
#[test]
fn construction_builds_placeholder_sets() {
    let cache = scenario_cache(ReplacementPolicy::Lru);

    assert_eq!(cache.num_sets(), 4);
    assert_eq!(cache.associativity(), 2);
    for set in 0..4 {
        assert_eq!(cache.find_tag(set, 0), Some(CoherenceState::Invalid));
        assert_eq!(cache.find_tag(set, 1), Some(CoherenceState::Invalid));
        // Placeholders are promoted in tag order: the highest tag is MRU.
        assert_eq!(cache.recency_order(set), vec![1, 0]);
    }
}

#[rstest]
#[case(16, 4, 4)]
#[case(16, 16, 1)]
#[case(12, 4, 3)]
#[case(5, 1, 5)]
fn construction_geometry(#[case] lines: usize, #[case] ways: usize, #[case] sets: usize) {
    let cache = SetCache::new(lines, ways, ReplacementPolicy::Lru);
    assert_eq!(cache.num_sets(), sets);
    for set in 0..sets {
        assert_eq!(cache.lines(set).len(), ways);
        assert_eq!(cache.recency_order(set).len(), ways);
    }
}

#[test]
#[should_panic(expected = "cannot be split")]
fn construction_rejects_indivisible_geometry() {
    let _ = SetCache::new(10, 4, ReplacementPolicy::Lru);
}

#[test]
#[should_panic(expected = "non-zero")]
fn construction_rejects_zero_associativity() {
    let _ = SetCache::new(8, 0, ReplacementPolicy::Lru);
}

/// The config path reports the same geometry problem as an error.
#[test]
fn from_config_reports_bad_geometry() {
    let config = CacheConfig {
        num_lines: 10,
        associativity: 4,
        ..CacheConfig::default()
    };
    let err = SetCache::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::IndivisibleGeometry {
            num_lines: 10,
            associativity: 4
        }
    ));
}

#[test]
fn from_config_applies_policy() {
    let config = CacheConfig {
        num_lines: 64,
        associativity: 4,
        policy: ReplacementPolicy::Random,
        ..CacheConfig::default()
    };
    let cache = SetCache::from_config(&config).unwrap();
    assert_eq!(cache.num_sets(), 16);
    assert_eq!(cache.policy(), ReplacementPolicy::Random);
}

// ══════════════════════════════════════════════════════════
// 2. Lookup and state mutation
// ══════════════════════════════════════════════════════════

/// An absent tag is distinguishable from a resident Invalid one.
#[test]
fn find_tag_distinguishes_absent_from_invalid() {
    let cache = scenario_cache(ReplacementPolicy::Lru);
    assert_eq!(cache.find_tag(0, 0), Some(CoherenceState::Invalid));
    assert_eq!(cache.find_tag(0, 7), None);
}

/// The sentinel lookup conflates both cases as Invalid.
#[test]
fn state_reports_absent_as_invalid() {
    let cache = scenario_cache(ReplacementPolicy::Lru);
    assert_eq!(cache.state(0, 7), CoherenceState::Invalid);
    assert_eq!(cache.state(0, 0), CoherenceState::Invalid);
}

#[rstest]
#[case(CoherenceState::Invalid)]
#[case(CoherenceState::Shared)]
#[case(CoherenceState::Exclusive)]
#[case(CoherenceState::Owned)]
#[case(CoherenceState::Modified)]
fn change_state_then_find_round_trips(#[case] state: CoherenceState) {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    assert!(cache.change_state(2, 1, state));
    assert_eq!(cache.find_tag(2, 1), Some(state));
    assert_eq!(cache.state(2, 1), state);
}

/// Changing the state of an absent tag is a silent no-op.
#[test]
fn change_state_absent_tag_is_noop() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    assert!(!cache.change_state(0, 42, CoherenceState::Modified));
    assert_eq!(cache.find_tag(0, 42), None);
    assert_eq!(
        cache.lines(0),
        &[
            CacheLine::new(0, CoherenceState::Invalid),
            CacheLine::new(1, CoherenceState::Invalid)
        ]
    );
}

/// Changing a state never touches recency.
#[test]
fn change_state_keeps_recency() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    assert!(cache.change_state(0, 0, CoherenceState::Shared));
    assert_eq!(cache.recency_order(0), vec![1, 0]);
}

// ══════════════════════════════════════════════════════════
// 3. Recency
// ══════════════════════════════════════════════════════════

#[test]
fn update_lru_moves_tag_to_head() {
    let mut cache = SetCache::new(4, 4, ReplacementPolicy::Lru);
    assert_eq!(cache.recency_order(0), vec![3, 2, 1, 0]);

    cache.update_lru(0, 1);
    assert_eq!(cache.recency_order(0), vec![1, 3, 2, 0]);

    cache.update_lru(0, 0);
    assert_eq!(cache.recency_order(0), vec![0, 1, 3, 2]);

    // Already MRU: no change.
    cache.update_lru(0, 0);
    assert_eq!(cache.recency_order(0), vec![0, 1, 3, 2]);
}

#[test]
#[should_panic(expected = "not resident")]
fn update_lru_on_absent_tag_panics_under_lru() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    cache.update_lru(0, 99);
}

/// Random replacement does not track recency; promotion is a no-op.
#[test]
fn update_lru_is_noop_under_random() {
    let mut cache = scenario_cache(ReplacementPolicy::Random);
    cache.update_lru(0, 0);
    assert_eq!(cache.recency_order(0), vec![1, 0]);
    // Even an absent tag is accepted.
    cache.update_lru(0, 99);
    assert_eq!(cache.recency_order(0), vec![1, 0]);
}

/// Sets keep independent recency orders.
#[test]
fn sets_are_independent() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    cache.update_lru(1, 0);
    assert_eq!(cache.recency_order(0), vec![1, 0]);
    assert_eq!(cache.recency_order(1), vec![0, 1]);

    let _ = cache.fill(3, 9, CoherenceState::Shared);
    assert_eq!(cache.find_tag(3, 9), Some(CoherenceState::Shared));
    for set in 0..3 {
        assert_eq!(cache.find_tag(set, 9), None);
    }
}

// ══════════════════════════════════════════════════════════
// 4. Writeback check and replacement
// ══════════════════════════════════════════════════════════

/// Worked example: Modified tag 1 is MRU, so the clean tag 0 is the victim.
#[test]
fn worked_example_replaces_clean_lru_line() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    assert!(cache.change_state(0, 1, CoherenceState::Modified));

    let victim = cache.check_writeback(0);
    assert_eq!(victim.tag(), 0);
    assert!(!victim.needs_writeback());

    let evicted = cache.insert_line(victim, 5, CoherenceState::Shared);
    assert_eq!(evicted, CacheLine::new(0, CoherenceState::Invalid));
    assert_eq!(cache.recency_order(0), vec![5, 1]);
    assert_eq!(cache.find_tag(0, 5), Some(CoherenceState::Shared));
    assert_eq!(cache.find_tag(0, 1), Some(CoherenceState::Modified));
    assert_eq!(cache.find_tag(0, 0), None);
}

#[rstest]
#[case(CoherenceState::Invalid, false)]
#[case(CoherenceState::Shared, false)]
#[case(CoherenceState::Exclusive, false)]
#[case(CoherenceState::Owned, true)]
#[case(CoherenceState::Modified, true)]
fn check_writeback_reports_dirty_victims(#[case] state: CoherenceState, #[case] dirty: bool) {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    assert!(cache.change_state(0, 0, state));

    let victim = cache.check_writeback(0);
    assert_eq!(victim.tag(), 0);
    assert_eq!(victim.state(), state);
    assert_eq!(victim.needs_writeback(), dirty);
}

/// Checking does not evict: the set is unchanged until the victim is committed.
#[test]
fn check_writeback_does_not_modify_set() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    let victim = cache.check_writeback(0);
    assert_eq!(victim.set(), 0);
    assert_eq!(cache.resident_tags(0), vec![0, 1]);
    assert_eq!(cache.recency_order(0), vec![1, 0]);
}

/// Successive fills evict in LRU order.
#[test]
fn lru_fill_sequence() {
    let mut cache = SetCache::new(4, 4, ReplacementPolicy::Lru);
    for tag in 10..14 {
        let _ = cache.fill(0, tag, CoherenceState::Exclusive);
    }
    assert_eq!(cache.recency_order(0), vec![13, 12, 11, 10]);

    cache.update_lru(0, 10);
    let victim = cache.check_writeback(0);
    assert_eq!(victim.tag(), 11);
    let evicted = cache.insert_line(victim, 20, CoherenceState::Modified);
    assert_eq!(evicted.tag, 11);
    assert_eq!(cache.recency_order(0), vec![20, 10, 13, 12]);
}

/// Under the random policy the committed eviction is always the checked victim.
#[test]
fn random_commit_evicts_checked_victim() {
    let mut cache = SetCache::with_seed(32, 8, ReplacementPolicy::Random, 99);
    for round in 0..200u64 {
        let set = (round % 4) as usize;
        let victim = cache.check_writeback(set);
        let checked = victim.tag();
        let evicted = cache.insert_line(victim, 1_000 + round, CoherenceState::Modified);
        assert_eq!(evicted.tag, checked);
        assert_eq!(cache.recency_order(set)[0], 1_000 + round);
        assert_eq!(cache.lines(set).len(), 8);
    }
}

/// A victim selected before another replacement of the same set is rejected.
#[test]
#[should_panic(expected = "stale victim")]
fn stale_victim_is_rejected() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    let first = cache.check_writeback(0);
    let second = cache.check_writeback(0);
    let _ = cache.insert_line(first, 5, CoherenceState::Shared);
    let _ = cache.insert_line(second, 6, CoherenceState::Shared);
}

/// A victim from another set does not go stale.
#[test]
fn victims_of_other_sets_stay_valid() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    let a = cache.check_writeback(0);
    let b = cache.check_writeback(1);
    let _ = cache.insert_line(a, 5, CoherenceState::Shared);
    let _ = cache.insert_line(b, 6, CoherenceState::Shared);
    assert_eq!(cache.recency_order(0), vec![5, 1]);
    assert_eq!(cache.recency_order(1), vec![6, 1]);
}

#[test]
#[should_panic(expected = "already resident")]
fn inserting_resident_tag_elsewhere_panics() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    // Victim is tag 0; tag 1 already lives in the other way.
    let victim = cache.check_writeback(0);
    let _ = cache.insert_line(victim, 1, CoherenceState::Shared);
}

/// Re-inserting the victim's own tag replaces it in place.
#[test]
fn reinserting_victim_tag_is_allowed() {
    let mut cache = scenario_cache(ReplacementPolicy::Lru);
    let victim = cache.check_writeback(0);
    let evicted = cache.insert_line(victim, 0, CoherenceState::Exclusive);
    assert_eq!(evicted.state, CoherenceState::Invalid);
    assert_eq!(cache.find_tag(0, 0), Some(CoherenceState::Exclusive));
    assert_eq!(cache.recency_order(0), vec![0, 1]);
}
