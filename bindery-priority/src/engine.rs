//! Prioritizer: scores, ranks, and explains candidate items.

use chrono::{DateTime, Utc};
use tracing::debug;

use bindery_core::cancel::CancelFlag;
use bindery_core::config::PriorityConfig;
use bindery_core::errors::{AssemblyError, BinderyResult};
use bindery_core::models::content_item::ContentItem;
use bindery_core::models::prioritization::{
    AlternativeRanking, PrioritizationContext, PrioritizationResult, PrioritizedItem,
    ScoringFactors,
};

use crate::learning::{self, FeedbackRecord};
use crate::scorer;
use crate::strategies::StrategyRegistry;

/// Score-spread threshold above which overall confidence gets a +10 bonus.
const SPREAD_BONUS_THRESHOLD: f64 = 0.3;

/// Multi-factor content prioritizer with a pluggable strategy registry.
pub struct Prioritizer {
    registry: StrategyRegistry,
    config: PriorityConfig,
}

impl Prioritizer {
    pub fn new(config: PriorityConfig) -> Self {
        Self {
            registry: StrategyRegistry::from_config(&config),
            config,
        }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Rank `items` against `context` with the named (or default) strategy.
    ///
    /// Empty input yields an empty result with confidence 0; empty context
    /// fields never error. The only error is a missing strategy name.
    pub fn prioritize(
        &self,
        items: &[ContentItem],
        context: &PrioritizationContext,
        strategy: Option<&str>,
    ) -> BinderyResult<PrioritizationResult> {
        self.prioritize_at(items, context, strategy, Utc::now(), &CancelFlag::new())
    }

    /// Full variant with an explicit clock and cancellation flag.
    pub fn prioritize_at(
        &self,
        items: &[ContentItem],
        context: &PrioritizationContext,
        strategy: Option<&str>,
        now: DateTime<Utc>,
        cancel: &CancelFlag,
    ) -> BinderyResult<PrioritizationResult> {
        let strategy_name = strategy.unwrap_or(&self.config.default_strategy);
        let selected = self.registry.get(strategy_name)?;

        if items.is_empty() {
            return Ok(PrioritizationResult::empty(strategy_name));
        }

        // Factor derivation is strategy-independent; derive once per item.
        let mut scored: Vec<(usize, ContentItem, ScoringFactors)> =
            Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(AssemblyError::Cancelled {
                    stage: "prioritized".to_string(),
                }
                .into());
            }
            let (factors, complexity, freshness, similarity) =
                scorer::derive_factors(item, context, now);
            let mut item = item.clone();
            item.features.complexity = complexity;
            item.features.freshness = freshness;
            item.features.similarity = similarity;
            scored.push((index, item, factors));
        }

        // Rank under the selected strategy. Stable sort keeps retrieval
        // order on ties, which makes ranks a dense 1..=N permutation.
        let mut ranked: Vec<(usize, ContentItem, ScoringFactors, f64)> = scored
            .iter()
            .map(|(i, item, f)| (*i, item.clone(), *f, selected.weights.composite(f)))
            .collect();
        ranked.sort_by(|a, b| b.3.partial_cmp(&a.3).unwrap_or(std::cmp::Ordering::Equal));

        let prioritized: Vec<PrioritizedItem> = ranked
            .into_iter()
            .enumerate()
            .map(|(pos, (_, item, factors, score))| PrioritizedItem {
                confidence: scorer::item_confidence(&factors),
                reasoning: scorer::reasoning(&factors),
                rank: pos + 1,
                item,
                factors,
                score,
            })
            .collect();

        let alternatives = self.alternative_rankings(strategy_name, &scored);
        let confidence = overall_confidence(&prioritized);

        debug!(
            strategy = strategy_name,
            items = prioritized.len(),
            alternatives = alternatives.len(),
            confidence,
            "prioritization complete"
        );

        Ok(PrioritizationResult {
            strategy: strategy_name.to_string(),
            items: prioritized,
            alternatives,
            confidence,
        })
    }

    /// Re-rank the same factor scores under every other registered strategy.
    fn alternative_rankings(
        &self,
        selected: &str,
        scored: &[(usize, ContentItem, ScoringFactors)],
    ) -> Vec<AlternativeRanking> {
        let mut alternatives = Vec::new();
        for name in self.registry.names() {
            if name == selected {
                continue;
            }
            let Ok(strategy) = self.registry.get(&name) else {
                continue;
            };
            let mut ordering: Vec<(usize, String, f64)> = scored
                .iter()
                .map(|(i, item, f)| (*i, item.id.clone(), strategy.weights.composite(f)))
                .collect();
            ordering.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
            alternatives.push(AlternativeRanking {
                strategy: name,
                ordering: ordering.into_iter().map(|(_, id, _)| id).collect(),
            });
        }
        alternatives
    }

    /// Nudge global strategy weights from one feedback record.
    pub fn learn_from_feedback(&self, feedback: &FeedbackRecord) {
        learning::learn_from_feedback(&self.registry, feedback, self.config.learning_rate);
    }
}

/// `min(100, avg_item_confidence*100 + (score_stddev > 0.3 ? 10 : 0))`.
fn overall_confidence(items: &[PrioritizedItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let n = items.len() as f64;
    let avg_confidence: f64 = items.iter().map(|i| i.confidence).sum::<f64>() / n;
    let mean_score: f64 = items.iter().map(|i| i.score).sum::<f64>() / n;
    let variance: f64 = items
        .iter()
        .map(|i| (i.score - mean_score).powi(2))
        .sum::<f64>()
        / n;
    let bonus = if variance.sqrt() > SPREAD_BONUS_THRESHOLD {
        10.0
    } else {
        0.0
    };
    (avg_confidence * 100.0 + bonus).min(100.0)
}
