use serde::{Deserialize, Serialize};

use super::prioritization::ScoringFactors;

/// Weight vector over the 7 scoring factors.
///
/// Weights are not required to sum to 1: the composite score is a literal
/// weighted sum and downstream confidence math depends on its raw magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub recency: f64,
    pub relevance: f64,
    pub effectiveness: f64,
    pub frequency: f64,
    pub agent_preference: f64,
    pub context_similarity: f64,
    pub user_feedback: f64,
}

impl StrategyWeights {
    /// Weighted sum of factors against this vector.
    pub fn composite(&self, f: &ScoringFactors) -> f64 {
        self.recency * f.recency
            + self.relevance * f.relevance
            + self.effectiveness * f.effectiveness
            + self.frequency * f.frequency
            + self.agent_preference * f.agent_preference
            + self.context_similarity * f.context_similarity
            + self.user_feedback * f.user_feedback
    }

    /// Apply `delta` to every weight, clamping each to [0.01, 0.5].
    pub fn nudge_all(&mut self, delta: f64) {
        for w in [
            &mut self.recency,
            &mut self.relevance,
            &mut self.effectiveness,
            &mut self.frequency,
            &mut self.agent_preference,
            &mut self.context_similarity,
            &mut self.user_feedback,
        ] {
            *w = (*w + delta).clamp(0.01, 0.5);
        }
    }
}

/// Self-reported strategy performance, updated by the learning step.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyPerformance {
    /// [0.0, 1.0].
    pub accuracy: f64,
    pub avg_time_ms: f64,
    /// [0.0, 1.0].
    pub satisfaction: f64,
    /// How quickly weights adapt to feedback, [0.0, 1.0].
    pub adaptation_rate: f64,
}

/// Named, long-lived prioritization strategy. Mutated only by learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    pub weights: StrategyWeights,
    pub performance: StrategyPerformance,
}

impl Strategy {
    pub fn new(name: impl Into<String>, weights: StrategyWeights) -> Self {
        Self {
            name: name.into(),
            weights,
            performance: StrategyPerformance::default(),
        }
    }
}
