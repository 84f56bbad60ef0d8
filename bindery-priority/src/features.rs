//! Feature derivation: freshness, Jaccard similarity, complexity, relevance.
//!
//! The formulas are coarse heuristics carried over from the source system.
//! Downstream confidence math depends on the raw composite magnitudes, so
//! they are frozen as-is.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use bindery_core::constants::{FRESHNESS_WINDOW_DAYS, SIMILARITY_MIN_TOKEN_LEN};
use bindery_core::models::content_item::ContentItem;
use bindery_core::models::prioritization::PrioritizationContext;

/// Normalization caps for the complexity feature.
const COMPLEXITY_WORD_CAP: f64 = 500.0;
const COMPLEXITY_CODE_BLOCK_CAP: f64 = 5.0;
const COMPLEXITY_TERM_CAP: f64 = 10.0;
const COMPLEXITY_DEP_CAP: f64 = 5.0;

/// Lowercase alphanumeric tokens with length >= 3.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= SIMILARITY_MIN_TOKEN_LEN)
        .map(String::from)
        .collect()
}

/// Jaccard similarity of two token sets. 0.0 when either is empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

/// Token set over item content + tags + category.
pub fn item_tokens(item: &ContentItem) -> HashSet<String> {
    let mut combined = item.content.clone();
    for tag in &item.metadata.tags {
        combined.push(' ');
        combined.push_str(tag);
    }
    combined.push(' ');
    combined.push_str(&item.metadata.category);
    tokenize(&combined)
}

/// Token set over context description + project + goals.
pub fn context_tokens(context: &PrioritizationContext) -> HashSet<String> {
    let mut combined = context.description.clone();
    combined.push(' ');
    combined.push_str(&context.project);
    for goal in &context.goals {
        combined.push(' ');
        combined.push_str(goal);
    }
    tokenize(&combined)
}

/// `max(0, 1 - age/90d)`.
pub fn freshness(item: &ContentItem, now: DateTime<Utc>) -> f64 {
    (1.0 - item.age_days(now) / FRESHNESS_WINDOW_DAYS).max(0.0)
}

/// Weighted sum of normalized word count (0.3), code blocks (0.2),
/// technical terms (0.3), dependencies (0.2), capped at 1.
pub fn complexity(item: &ContentItem) -> f64 {
    let words = (item.features.word_count as f64 / COMPLEXITY_WORD_CAP).min(1.0);
    let blocks = (item.features.code_block_count as f64 / COMPLEXITY_CODE_BLOCK_CAP).min(1.0);
    let terms = (item.features.technical_terms as f64 / COMPLEXITY_TERM_CAP).min(1.0);
    let deps = (item.features.dependencies.len() as f64 / COMPLEXITY_DEP_CAP).min(1.0);
    (words * 0.3 + blocks * 0.2 + terms * 0.3 + deps * 0.2).min(1.0)
}

/// Whether the item names the requesting agent type.
pub fn agent_type_match(item: &ContentItem, context: &PrioritizationContext) -> bool {
    if context.agent_type.is_empty() {
        return false;
    }
    let agent = context.agent_type.to_lowercase();
    item.metadata.category.to_lowercase().contains(&agent)
        || item
            .metadata
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&agent))
}

/// Whether the item names the context's project.
pub fn project_match(item: &ContentItem, context: &PrioritizationContext) -> bool {
    if context.project.is_empty() {
        return false;
    }
    let project = context.project.to_lowercase();
    item.metadata.category.to_lowercase().contains(&project)
        || item
            .metadata
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(&project))
}

/// Fraction of goals whose tokens intersect the item's category + tags.
pub fn category_goal_overlap(item: &ContentItem, context: &PrioritizationContext) -> f64 {
    if context.goals.is_empty() {
        return 0.0;
    }
    let mut cat = item.metadata.category.clone();
    for tag in &item.metadata.tags {
        cat.push(' ');
        cat.push_str(tag);
    }
    let cat_tokens = tokenize(&cat);
    let matching = context
        .goals
        .iter()
        .filter(|g| !tokenize(g).is_disjoint(&cat_tokens))
        .count();
    matching as f64 / context.goals.len() as f64
}

/// `agentTypeMatch(0.3) + projectMatch(0.2) + similarity*0.3 +
/// categoryGoalOverlap(0.2)`, capped at 1.
pub fn relevance(item: &ContentItem, context: &PrioritizationContext, similarity: f64) -> f64 {
    let agent = if agent_type_match(item, context) { 0.3 } else { 0.0 };
    let project = if project_match(item, context) { 0.2 } else { 0.0 };
    let overlap = category_goal_overlap(item, context) * 0.2;
    (agent + project + similarity * 0.3 + overlap).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_short_tokens() {
        let tokens = tokenize("Fix a DB bug in the parser");
        assert!(tokens.contains("fix"));
        assert!(tokens.contains("parser"));
        assert!(!tokens.contains("a"));
        assert!(!tokens.contains("db"));
    }

    #[test]
    fn jaccard_empty_is_zero() {
        let a = tokenize("");
        let b = tokenize("anything here");
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_identical_is_one() {
        let a = tokenize("parse the config file");
        assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
    }
}
