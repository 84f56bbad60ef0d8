use proptest::prelude::*;

use bindery_core::cancel::CancelFlag;
use bindery_core::config::PriorityConfig;
use bindery_core::models::content_item::ContentType;
use bindery_priority::Prioritizer;
use test_fixtures::{fixed_now, make_context, make_item};

fn arb_items(max: usize) -> impl Strategy<Value = Vec<(String, u64, f64)>> {
    prop::collection::vec(
        ("[a-z]{3,12}( [a-z]{3,12}){0,8}", 0u64..200, 0.0f64..1.0),
        1..max,
    )
}

proptest! {
    // ── Rank density: gapless, duplicate-free 1..=N ───────────────────────
    #[test]
    fn ranks_form_dense_permutation(specs in arb_items(24)) {
        let p = Prioritizer::new(PriorityConfig::default());
        let items: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, (content, usage, eff))| {
                let mut item = make_item(&format!("item-{i}"), ContentType::Knowledge, content);
                item.metrics.usage_count = *usage;
                item.metrics.effectiveness = *eff;
                item
            })
            .collect();

        let result = p
            .prioritize_at(&items, &make_context(), None, fixed_now(), &CancelFlag::new())
            .unwrap();

        let mut ranks: Vec<usize> = result.items.iter().map(|i| i.rank).collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=items.len()).collect::<Vec<_>>());
    }

    // ── Determinism across repeated calls ─────────────────────────────────
    #[test]
    fn repeated_calls_are_identical(specs in arb_items(16)) {
        let p = Prioritizer::new(PriorityConfig::default());
        let items: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, (content, usage, eff))| {
                let mut item = make_item(&format!("item-{i}"), ContentType::Memory, content);
                item.metrics.usage_count = *usage;
                item.metrics.effectiveness = *eff;
                item
            })
            .collect();

        let now = fixed_now();
        let cancel = CancelFlag::new();
        let ctx = make_context();
        let a = p.prioritize_at(&items, &ctx, None, now, &cancel).unwrap();
        let b = p.prioritize_at(&items, &ctx, None, now, &cancel).unwrap();

        for (x, y) in a.items.iter().zip(b.items.iter()) {
            prop_assert_eq!(&x.item.id, &y.item.id);
            prop_assert_eq!(x.score, y.score);
        }
    }

    // ── Per-item confidence and factors stay in range ─────────────────────
    #[test]
    fn confidence_and_factors_bounded(specs in arb_items(16)) {
        let p = Prioritizer::new(PriorityConfig::default());
        let items: Vec<_> = specs
            .iter()
            .enumerate()
            .map(|(i, (content, usage, eff))| {
                let mut item = make_item(&format!("item-{i}"), ContentType::Realtime, content);
                item.metrics.usage_count = *usage;
                item.metrics.effectiveness = *eff;
                item
            })
            .collect();

        let result = p
            .prioritize_at(&items, &make_context(), None, fixed_now(), &CancelFlag::new())
            .unwrap();

        prop_assert!(result.confidence >= 0.0 && result.confidence <= 100.0);
        for item in &result.items {
            prop_assert!(item.confidence >= 0.3 && item.confidence <= 1.0);
            for f in item.factors.as_array() {
                prop_assert!((0.0..=1.0).contains(&f), "factor out of range: {f}");
            }
        }
    }
}
