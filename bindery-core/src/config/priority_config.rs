use serde::{Deserialize, Serialize};

use super::defaults;

/// Prioritizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    /// Strategy used when a request does not name one.
    pub default_strategy: String,
    /// Gates registration of the ML-enhanced strategy.
    pub ml_ranking_enabled: bool,
    /// Scale of per-feedback weight nudges.
    pub learning_rate: f64,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            default_strategy: defaults::DEFAULT_STRATEGY.to_string(),
            ml_ranking_enabled: defaults::DEFAULT_ML_RANKING_ENABLED,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
        }
    }
}
