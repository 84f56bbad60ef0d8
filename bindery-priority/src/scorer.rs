//! 7-factor scorer: recency, relevance, effectiveness, frequency,
//! agent preference, context similarity, user feedback.

use chrono::{DateTime, Utc};

use bindery_core::constants::FREQUENCY_SATURATION;
use bindery_core::models::content_item::{ContentItem, ContentType};
use bindery_core::models::prioritization::{PrioritizationContext, ScoringFactors};

use crate::features;

/// Per-item confidence thresholds.
const HIGH_FACTOR: f64 = 0.7;
const MEDIUM_FACTOR: f64 = 0.4;

/// Derive the 7 factor scores for one item against the context.
///
/// Also returns the filled-in derived features (complexity, freshness,
/// similarity) so the caller can attach them to the item.
pub fn derive_factors(
    item: &ContentItem,
    context: &PrioritizationContext,
    now: DateTime<Utc>,
) -> (ScoringFactors, f64, f64, f64) {
    let freshness = features::freshness(item, now);
    let similarity = features::jaccard(
        &features::item_tokens(item),
        &features::context_tokens(context),
    );
    let complexity = features::complexity(item);

    let factors = ScoringFactors {
        recency: freshness,
        relevance: features::relevance(item, context, similarity),
        effectiveness: item.metrics.effectiveness.clamp(0.0, 1.0),
        frequency: (item.metrics.usage_count as f64 / FREQUENCY_SATURATION).min(1.0),
        agent_preference: agent_preference(item, context),
        context_similarity: similarity,
        user_feedback: (item.metrics.rating / 5.0).clamp(0.0, 1.0),
    };

    (factors, complexity, freshness, similarity)
}

/// 1.0 when tags/category name the agent type, 0.8 for agent-specific
/// items, 0.5 baseline otherwise.
fn agent_preference(item: &ContentItem, context: &PrioritizationContext) -> f64 {
    if features::agent_type_match(item, context) {
        1.0
    } else if item.content_type == ContentType::AgentSpecific {
        0.8
    } else {
        0.5
    }
}

/// `min(1, high*0.15 + medium*0.08 + 0.3)` where high counts factors > 0.7
/// and medium counts factors in (0.4, 0.7].
pub fn item_confidence(factors: &ScoringFactors) -> f64 {
    let mut high = 0usize;
    let mut medium = 0usize;
    for f in factors.as_array() {
        if f > HIGH_FACTOR {
            high += 1;
        } else if f > MEDIUM_FACTOR {
            medium += 1;
        }
    }
    (high as f64 * 0.15 + medium as f64 * 0.08 + 0.3).min(1.0)
}

/// Short reasoning string naming the two dominant factors.
pub fn reasoning(factors: &ScoringFactors) -> String {
    const NAMES: [&str; 7] = [
        "recency",
        "relevance",
        "effectiveness",
        "frequency",
        "agent preference",
        "context similarity",
        "user feedback",
    ];
    let values = factors.as_array();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    format!(
        "ranked on {} ({:.2}) and {} ({:.2})",
        NAMES[indexed[0].0],
        indexed[0].1,
        NAMES[indexed[1].0],
        indexed[1].1,
    )
}
