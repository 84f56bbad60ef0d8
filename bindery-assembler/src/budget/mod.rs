//! Budget enforcement.
//!
//! Items arrive in rank order. Each item is included whole when it fits;
//! when it does not, progressively lossier optimizations are tried in a
//! fixed order (truncate, substitute, compress, eliminate) and every
//! applied optimization is logged. An essential top-ranked item is never
//! eliminated, even when that leaves the pack over budget.

pub mod counter;
pub mod optimizer;

use std::collections::HashMap;

use tracing::debug;

use bindery_core::cancel::CancelFlag;
use bindery_core::errors::AssemblyError;
use bindery_core::models::{
    OptimizationImpact, OptimizationKind, OptimizationRecord, PackWarning, PrioritizedItem,
    TokenUsage, WarningSeverity,
};

pub use counter::SizeCounter;

/// Result of running budget enforcement over a ranked item list.
#[derive(Debug)]
pub struct BudgetOutcome {
    /// Items that survived, in rank order, possibly with rewritten content.
    pub included: Vec<PrioritizedItem>,
    pub usage: TokenUsage,
    pub warnings: Vec<PackWarning>,
}

pub struct BudgetManager {
    counter: SizeCounter,
}

impl BudgetManager {
    pub fn new(counter: SizeCounter) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &SizeCounter {
        &self.counter
    }

    /// Walk `items` in rank order, fitting each into the remaining budget.
    ///
    /// The only case that leaves `total_tokens` above `limit` is an
    /// essential top-ranked item that cannot be shrunk to fit. That case
    /// is reported through an error-severity `budget_exceeded` warning
    /// rather than a hard failure.
    pub fn enforce_budget(
        &self,
        items: Vec<PrioritizedItem>,
        limit: usize,
        cancel: &CancelFlag,
    ) -> Result<BudgetOutcome, AssemblyError> {
        let mut included = Vec::with_capacity(items.len());
        let mut optimizations = Vec::new();
        let mut warnings = Vec::new();
        let mut breakdown: HashMap<String, usize> = HashMap::new();
        let mut total: usize = 0;

        for mut ranked in items {
            if cancel.is_cancelled() {
                return Err(AssemblyError::Cancelled {
                    stage: "budget-enforced".to_string(),
                });
            }

            let section = ranked.item.content_type.section_name();
            let original_cost = self.counter.count(&ranked.item.content);
            let remaining = limit.saturating_sub(total);

            let cost = if original_cost <= remaining {
                original_cost
            } else if let Some(fitted) =
                self.shrink_to_fit(&mut ranked, original_cost, remaining, &mut optimizations)
            {
                fitted
            } else if ranked.rank == 1 && ranked.item.is_essential() {
                // Essential content is kept whole even over budget.
                warnings.push(PackWarning::new(
                    "budget_exceeded",
                    WarningSeverity::Error,
                    format!(
                        "essential item `{}` kept over budget ({} units, {} remaining)",
                        ranked.item.id, original_cost, remaining
                    ),
                    "raise the budget limit or reduce essential content size",
                ));
                original_cost
            } else {
                debug!(item_id = %ranked.item.id, units = original_cost, "eliminated");
                optimizations.push(OptimizationRecord {
                    kind: OptimizationKind::Eliminate,
                    description: format!("eliminated item `{}`", ranked.item.id),
                    units_saved: original_cost,
                    impact: OptimizationImpact::High,
                });
                continue;
            };

            total += cost;
            *breakdown.entry(section.to_string()).or_default() += cost;
            included.push(ranked);
        }

        let utilization = if limit == 0 {
            0.0
        } else {
            total as f64 / limit as f64 * 100.0
        };

        Ok(BudgetOutcome {
            included,
            usage: TokenUsage {
                total_tokens: total,
                budget_limit: limit,
                utilization,
                breakdown,
                optimizations,
            },
            warnings,
        })
    }

    /// Try truncate, then summary substitution, then whitespace
    /// compression. Rewrites the item content and returns its new cost on
    /// success.
    fn shrink_to_fit(
        &self,
        ranked: &mut PrioritizedItem,
        original_cost: usize,
        remaining: usize,
        optimizations: &mut Vec<OptimizationRecord>,
    ) -> Option<usize> {
        if let Some(truncated) =
            optimizer::truncate_to_fit(&ranked.item.content, remaining, &self.counter)
        {
            let cost = self.counter.count(&truncated);
            optimizations.push(OptimizationRecord {
                kind: OptimizationKind::Truncate,
                description: format!("truncated item `{}`", ranked.item.id),
                units_saved: original_cost - cost,
                impact: saved_impact(original_cost, cost),
            });
            ranked.item.content = truncated;
            return Some(cost);
        }

        let summary = optimizer::substitute_summary(&ranked.item.content);
        let cost = self.counter.count(&summary);
        if cost <= remaining && cost < original_cost {
            optimizations.push(OptimizationRecord {
                kind: OptimizationKind::SubstituteSummary,
                description: format!("substituted summary for item `{}`", ranked.item.id),
                units_saved: original_cost - cost,
                impact: OptimizationImpact::High,
            });
            ranked.item.content = summary;
            return Some(cost);
        }

        let compressed = optimizer::compress_whitespace(&ranked.item.content);
        let cost = self.counter.count(&compressed);
        if cost <= remaining && cost < original_cost {
            optimizations.push(OptimizationRecord {
                kind: OptimizationKind::Compress,
                description: format!("compressed whitespace in item `{}`", ranked.item.id),
                units_saved: original_cost - cost,
                impact: OptimizationImpact::Low,
            });
            ranked.item.content = compressed;
            return Some(cost);
        }

        None
    }
}

fn saved_impact(original: usize, kept: usize) -> OptimizationImpact {
    let saved = (original - kept) as f64 / original.max(1) as f64;
    if saved >= 0.75 {
        OptimizationImpact::High
    } else if saved >= 0.3 {
        OptimizationImpact::Medium
    } else {
        OptimizationImpact::Low
    }
}
