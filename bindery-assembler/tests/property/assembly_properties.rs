use proptest::prelude::*;

use bindery_assembler::budget::{BudgetManager, SizeCounter};
use bindery_core::cancel::CancelFlag;
use bindery_core::config::CountingMethod;
use bindery_core::models::{ContentType, PrioritizedItem, ScoringFactors};
use test_fixtures::make_item;

fn arb_contents(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z .]{0,300}", 0..max)
}

fn ranked(contents: &[String]) -> Vec<PrioritizedItem> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| PrioritizedItem {
            item: make_item(&format!("item-{i}"), ContentType::Knowledge, content),
            factors: ScoringFactors::default(),
            score: 1.0,
            rank: i + 1,
            confidence: 0.5,
            reasoning: String::new(),
        })
        .collect()
}

proptest! {
    // ── Budget invariant: within limit or flagged as exceeded ─────────────
    #[test]
    fn usage_within_limit_or_error_warning(contents in arb_contents(16), limit in 0usize..600) {
        let manager = BudgetManager::new(SizeCounter::new(CountingMethod::Characters));
        let outcome = manager
            .enforce_budget(ranked(&contents), limit, &CancelFlag::new())
            .unwrap();

        let exceeded = outcome.usage.total_tokens > limit;
        let flagged = outcome
            .warnings
            .iter()
            .any(|w| w.warning_type == "budget_exceeded" && w.is_error());
        prop_assert!(!exceeded || flagged);
    }

    // ── Accounting: total equals the section breakdown sum ────────────────
    #[test]
    fn breakdown_sums_to_total(contents in arb_contents(16), limit in 0usize..600) {
        let manager = BudgetManager::new(SizeCounter::new(CountingMethod::Characters));
        let outcome = manager
            .enforce_budget(ranked(&contents), limit, &CancelFlag::new())
            .unwrap();

        let sum: usize = outcome.usage.breakdown.values().sum();
        prop_assert_eq!(sum, outcome.usage.total_tokens);
    }

    // ── Survivors keep their relative rank order ──────────────────────────
    #[test]
    fn included_items_preserve_rank_order(contents in arb_contents(16), limit in 0usize..600) {
        let manager = BudgetManager::new(SizeCounter::new(CountingMethod::Characters));
        let outcome = manager
            .enforce_budget(ranked(&contents), limit, &CancelFlag::new())
            .unwrap();

        let ranks: Vec<usize> = outcome.included.iter().map(|item| item.rank).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ranks, sorted);
    }
}
