use proptest::prelude::*;

use bindery_cache::CacheEngine;
use bindery_core::config::{CacheConfig, EvictionPolicy, StorageTier};

fn engine(policy: EvictionPolicy, max_size: u64) -> CacheEngine<String> {
    CacheEngine::new(CacheConfig {
        tier: StorageTier::Memory,
        eviction_policy: policy,
        max_size_bytes: max_size,
        compression_threshold_bytes: None,
        ..CacheConfig::default()
    })
    .unwrap()
}

fn arb_policy() -> impl Strategy<Value = EvictionPolicy> {
    prop_oneof![
        Just(EvictionPolicy::Lru),
        Just(EvictionPolicy::Lfu),
        Just(EvictionPolicy::Ttl),
        Just(EvictionPolicy::Random),
    ]
}

proptest! {
    // ── Eviction bound: size never exceeds capacity after any set ─────────
    #[test]
    fn size_bounded_under_every_policy(
        policy in arb_policy(),
        sizes in prop::collection::vec(3usize..400, 1..40),
    ) {
        let cache = engine(policy, 1_000);
        for (i, size) in sizes.iter().enumerate() {
            let value = "x".repeat(*size);
            cache
                .set(&format!("k{i}"), &value, Some(3_600), vec![], vec![])
                .unwrap();
            prop_assert!(
                cache.current_size_bytes() <= 1_000,
                "size {} exceeds capacity after set #{i} under {:?}",
                cache.current_size_bytes(),
                policy
            );
        }
    }

    // ── Set-then-get returns the stored value ─────────────────────────────
    #[test]
    fn fresh_set_is_always_readable(value in "[a-zA-Z0-9 ]{0,200}") {
        let cache = engine(EvictionPolicy::Lru, 1_000_000);
        cache.set("key", &value, Some(3_600), vec![], vec![]).unwrap();
        prop_assert_eq!(cache.get("key"), Some(value));
    }

    // ── Invalidation removes exactly the matching keys ────────────────────
    #[test]
    fn invalidation_is_exact(
        foo_count in 1usize..10,
        bar_count in 1usize..10,
    ) {
        let cache = engine(EvictionPolicy::Lru, 1_000_000);
        for i in 0..foo_count {
            cache.set(&format!("foo.{i}"), &"v".to_string(), Some(3_600), vec![], vec![]).unwrap();
        }
        for i in 0..bar_count {
            cache.set(&format!("bar.{i}"), &"v".to_string(), Some(3_600), vec![], vec![]).unwrap();
        }

        let ctx = cache.invalidate("foo.*").unwrap();
        prop_assert_eq!(ctx.affected_keys.len(), foo_count);
        for i in 0..foo_count {
            let foo_hit = cache.get(&format!("foo.{i}"));
            prop_assert!(foo_hit.is_none());
        }
        for i in 0..bar_count {
            let bar_hit = cache.get(&format!("bar.{i}"));
            prop_assert!(bar_hit.is_some());
        }
    }
}
