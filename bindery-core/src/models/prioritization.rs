use serde::{Deserialize, Serialize};

use super::content_item::ContentItem;

/// Target context a request is prioritized against. Immutable per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizationContext {
    pub issue_id: String,
    pub agent_type: String,
    pub description: String,
    pub project: String,
    /// Prior task summaries, newest last.
    pub history: Vec<String>,
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub preferences: Vec<String>,
}

/// Per-factor scores, each in [0.0, 1.0].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringFactors {
    pub recency: f64,
    pub relevance: f64,
    pub effectiveness: f64,
    pub frequency: f64,
    pub agent_preference: f64,
    pub context_similarity: f64,
    pub user_feedback: f64,
}

impl ScoringFactors {
    /// Factors as a fixed-order array (same order as `StrategyWeights`).
    pub fn as_array(&self) -> [f64; 7] {
        [
            self.recency,
            self.relevance,
            self.effectiveness,
            self.frequency,
            self.agent_preference,
            self.context_similarity,
            self.user_feedback,
        ]
    }
}

/// A content item after scoring and ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedItem {
    pub item: ContentItem,
    pub factors: ScoringFactors,
    /// Composite weighted score. Intentionally unnormalized.
    pub score: f64,
    /// Dense rank, 1..=N, ties broken by original retrieval order.
    pub rank: usize,
    /// Per-item confidence [0.0, 1.0].
    pub confidence: f64,
    /// Human-readable summary naming the dominant factors.
    pub reasoning: String,
}

/// An alternative ranking produced by a non-selected strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeRanking {
    pub strategy: String,
    /// Item ids in that strategy's rank order.
    pub ordering: Vec<String>,
}

/// Full prioritizer output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizationResult {
    pub strategy: String,
    pub items: Vec<PrioritizedItem>,
    pub alternatives: Vec<AlternativeRanking>,
    /// Overall confidence [0.0, 100.0].
    pub confidence: f64,
}

impl PrioritizationResult {
    /// Empty result (no candidate items), confidence 0.
    pub fn empty(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            items: Vec::new(),
            alternatives: Vec::new(),
            confidence: 0.0,
        }
    }
}
