//! Budget manager tests: fit, optimization cascade, essential override.

use bindery_assembler::budget::{BudgetManager, SizeCounter};
use bindery_core::cancel::CancelFlag;
use bindery_core::config::CountingMethod;
use bindery_core::errors::AssemblyError;
use bindery_core::models::{
    ContentItem, OptimizationKind, PrioritizedItem, ScoringFactors, WarningSeverity,
};
use test_fixtures::{make_item, make_sized_item};

fn ranked(items: Vec<ContentItem>) -> Vec<PrioritizedItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| PrioritizedItem {
            item,
            factors: ScoringFactors::default(),
            score: 1.0 - i as f64 * 0.01,
            rank: i + 1,
            confidence: 0.5,
            reasoning: String::new(),
        })
        .collect()
}

fn char_manager() -> BudgetManager {
    BudgetManager::new(SizeCounter::new(CountingMethod::Characters))
}

#[test]
fn everything_fits_under_a_generous_budget() {
    let manager = char_manager();
    let items = ranked(vec![
        make_sized_item("a", 100),
        make_sized_item("b", 100),
    ]);

    let outcome = manager
        .enforce_budget(items, 1_000, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 2);
    assert_eq!(outcome.usage.total_tokens, 200);
    assert!(outcome.usage.optimizations.is_empty());
    assert!(outcome.warnings.is_empty());
    assert!((outcome.usage.utilization - 20.0).abs() < 1e-9);
}

#[test]
fn breakdown_is_per_section() {
    let manager = char_manager();
    let items = ranked(vec![
        make_item("m", bindery_core::models::ContentType::Memory, "aaaa"),
        make_item("k", bindery_core::models::ContentType::Knowledge, "bbbbbb"),
    ]);

    let outcome = manager
        .enforce_budget(items, 100, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.usage.breakdown.get("memory"), Some(&4));
    assert_eq!(outcome.usage.breakdown.get("knowledge"), Some(&6));
}

#[test]
fn oversized_item_is_truncated_with_ellipsis() {
    let manager = char_manager();
    let items = ranked(vec![make_sized_item("big", 100)]);

    let outcome = manager
        .enforce_budget(items, 80, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 1);
    assert!(outcome.included[0].item.content.ends_with('…'));
    assert!(outcome.usage.total_tokens <= 80);
    assert_eq!(outcome.usage.optimizations.len(), 1);
    assert_eq!(outcome.usage.optimizations[0].kind, OptimizationKind::Truncate);
    assert!(outcome.usage.optimizations[0].units_saved > 0);
}

#[test]
fn summary_substitution_when_truncation_is_too_lossy() {
    let manager = char_manager();
    let content = format!("Retry failed. {}", "x".repeat(400));
    let items = ranked(vec![make_item(
        "verbose",
        bindery_core::models::ContentType::Knowledge,
        &content,
    )]);

    let outcome = manager
        .enforce_budget(items, 20, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 1);
    assert_eq!(outcome.included[0].item.content, "Retry failed.");
    assert_eq!(
        outcome.usage.optimizations[0].kind,
        OptimizationKind::SubstituteSummary
    );
}

#[test]
fn whitespace_compression_as_a_last_resort_before_elimination() {
    let manager = char_manager();
    // 480 characters, 40 words; compressed form is 79 characters.
    let content = "a           ".repeat(40);
    let items = ranked(vec![make_item(
        "airy",
        bindery_core::models::ContentType::Knowledge,
        &content,
    )]);

    let outcome = manager
        .enforce_budget(items, 100, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 1);
    assert_eq!(outcome.included[0].item.content, "a ".repeat(39) + "a");
    assert_eq!(outcome.usage.optimizations[0].kind, OptimizationKind::Compress);
    assert!(outcome.usage.total_tokens <= 100);
}

#[test]
fn unshrinkable_items_are_eliminated() {
    let manager = char_manager();
    let items = ranked((0..10)
        .map(|i| make_sized_item(&format!("item-{i}"), 50))
        .collect());

    let outcome = manager
        .enforce_budget(items, 300, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 6);
    assert_eq!(outcome.usage.total_tokens, 300);
    let eliminated = outcome
        .usage
        .optimizations
        .iter()
        .filter(|o| o.kind == OptimizationKind::Eliminate)
        .count();
    assert_eq!(eliminated, 4);
    // Rank order is preserved among survivors.
    let ids: Vec<&str> = outcome
        .included
        .iter()
        .map(|item| item.item.id.as_str())
        .collect();
    assert_eq!(ids, ["item-0", "item-1", "item-2", "item-3", "item-4", "item-5"]);
}

#[test]
fn essential_top_item_is_kept_over_budget_with_an_error_warning() {
    let manager = char_manager();
    let mut item = make_sized_item("critical", 100);
    item.metadata.scope = "issue-critical".to_string();
    let items = ranked(vec![item]);

    let outcome = manager.enforce_budget(items, 1, &CancelFlag::new()).unwrap();

    assert_eq!(outcome.included.len(), 1);
    assert_eq!(outcome.included[0].item.content.len(), 100);
    assert_eq!(outcome.usage.total_tokens, 100);
    assert!(outcome.usage.total_tokens > outcome.usage.budget_limit);
    let exceeded: Vec<_> = outcome
        .warnings
        .iter()
        .filter(|w| w.warning_type == "budget_exceeded")
        .collect();
    assert_eq!(exceeded.len(), 1);
    assert_eq!(exceeded[0].severity, WarningSeverity::Error);
}

#[test]
fn essential_item_below_rank_one_is_not_exempt() {
    let manager = char_manager();
    let mut second = make_sized_item("late-critical", 100);
    second.metadata.scope = "issue-critical".to_string();
    let items = ranked(vec![make_sized_item("first", 100), second]);

    let outcome = manager
        .enforce_budget(items, 100, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.included.len(), 1);
    assert_eq!(outcome.included[0].item.id, "first");
    assert!(outcome.warnings.is_empty());
}

#[test]
fn word_counting_budgets_by_words() {
    let manager = BudgetManager::new(SizeCounter::new(CountingMethod::Words));
    let items = ranked(vec![make_item(
        "words",
        bindery_core::models::ContentType::Knowledge,
        "one two three four five",
    )]);

    let outcome = manager
        .enforce_budget(items, 10, &CancelFlag::new())
        .unwrap();

    assert_eq!(outcome.usage.total_tokens, 5);
    assert!((outcome.usage.utilization - 50.0).abs() < 1e-9);
}

#[test]
fn cancellation_aborts_enforcement() {
    let manager = char_manager();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = manager
        .enforce_budget(ranked(vec![make_sized_item("a", 10)]), 100, &cancel)
        .unwrap_err();
    assert!(matches!(err, AssemblyError::Cancelled { .. }));
}
