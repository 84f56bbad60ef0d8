//! Strategy registry. Strategies are typed weight vectors selected by name
//! at construction time; the built-ins are registered from config.

use dashmap::DashMap;

use bindery_core::config::PriorityConfig;
use bindery_core::errors::{BinderyResult, PriorityError};
use bindery_core::models::strategy::{Strategy, StrategyWeights};

/// Rule-derived weights: favor relevance and recency.
pub fn rule_based_weights() -> StrategyWeights {
    StrategyWeights {
        recency: 0.20,
        relevance: 0.30,
        effectiveness: 0.10,
        frequency: 0.05,
        agent_preference: 0.10,
        context_similarity: 0.15,
        user_feedback: 0.10,
    }
}

/// ML-derived weights: favor learned effectiveness and feedback signals.
pub fn ml_enhanced_weights() -> StrategyWeights {
    StrategyWeights {
        recency: 0.10,
        relevance: 0.20,
        effectiveness: 0.25,
        frequency: 0.10,
        agent_preference: 0.10,
        context_similarity: 0.10,
        user_feedback: 0.15,
    }
}

/// Default blend of the rule and ML vectors.
pub fn hybrid_weights() -> StrategyWeights {
    let rule = rule_based_weights();
    let ml = ml_enhanced_weights();
    StrategyWeights {
        recency: (rule.recency + ml.recency) / 2.0,
        relevance: (rule.relevance + ml.relevance) / 2.0,
        effectiveness: (rule.effectiveness + ml.effectiveness) / 2.0,
        frequency: (rule.frequency + ml.frequency) / 2.0,
        agent_preference: (rule.agent_preference + ml.agent_preference) / 2.0,
        context_similarity: (rule.context_similarity + ml.context_similarity) / 2.0,
        user_feedback: (rule.user_feedback + ml.user_feedback) / 2.0,
    }
}

/// Concurrent registry of named strategies.
pub struct StrategyRegistry {
    strategies: DashMap<String, Strategy>,
}

impl StrategyRegistry {
    /// Register the built-ins. `ml-enhanced` is gated by config.
    pub fn from_config(config: &PriorityConfig) -> Self {
        let registry = Self {
            strategies: DashMap::new(),
        };
        registry.register(Strategy::new("rule-based", rule_based_weights()));
        registry.register(Strategy::new("hybrid", hybrid_weights()));
        if config.ml_ranking_enabled {
            registry.register(Strategy::new("ml-enhanced", ml_enhanced_weights()));
        }
        registry
    }

    pub fn register(&self, strategy: Strategy) {
        self.strategies.insert(strategy.name.clone(), strategy);
    }

    /// Cloned snapshot of a strategy.
    pub fn get(&self, name: &str) -> BinderyResult<Strategy> {
        self.strategies
            .get(name)
            .map(|s| s.clone())
            .ok_or_else(|| {
                PriorityError::UnknownStrategy {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Registered names, sorted for deterministic iteration.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.strategies.iter().map(|s| s.key().clone()).collect();
        names.sort();
        names
    }

    /// Mutate every strategy in place (used by the learning step).
    pub fn for_each_mut(&self, mut f: impl FnMut(&mut Strategy)) {
        for mut entry in self.strategies.iter_mut() {
            f(entry.value_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ml_strategy_gated_by_config() {
        let enabled = StrategyRegistry::from_config(&PriorityConfig::default());
        assert!(enabled.get("ml-enhanced").is_ok());

        let config = PriorityConfig {
            ml_ranking_enabled: false,
            ..PriorityConfig::default()
        };
        let disabled = StrategyRegistry::from_config(&config);
        assert!(disabled.get("ml-enhanced").is_err());
        assert!(disabled.get("hybrid").is_ok());
    }

    #[test]
    fn unknown_strategy_errors() {
        let registry = StrategyRegistry::from_config(&PriorityConfig::default());
        assert!(registry.get("nope").is_err());
    }
}
