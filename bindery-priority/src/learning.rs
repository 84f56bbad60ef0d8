//! Feedback-driven weight adjustment.
//!
//! Online, unbounded adjustment: every feedback nudges the global weight
//! vectors by `((rating - 2.5) / 2.5) * learning_rate * 0.1`, each weight
//! clamped to [0.01, 0.5]. No convergence guarantee.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::strategies::StrategyRegistry;

/// User feedback on a returned ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Pack or ranking the feedback refers to.
    pub pack_id: String,
    /// [0.0, 5.0]; 2.5 is neutral.
    pub rating: f64,
    pub comment: Option<String>,
}

/// Nudge every registered strategy's weights from one feedback record.
pub fn learn_from_feedback(
    registry: &StrategyRegistry,
    feedback: &FeedbackRecord,
    learning_rate: f64,
) {
    let signal = (feedback.rating.clamp(0.0, 5.0) - 2.5) / 2.5;
    let delta = signal * learning_rate * 0.1;

    registry.for_each_mut(|strategy| {
        strategy.weights.nudge_all(delta);
        let perf = &mut strategy.performance;
        perf.satisfaction = perf.satisfaction * 0.9 + (feedback.rating.clamp(0.0, 5.0) / 5.0) * 0.1;
        perf.adaptation_rate = delta.abs();
    });

    debug!(
        pack_id = %feedback.pack_id,
        rating = feedback.rating,
        delta,
        "applied feedback to strategy weights"
    );
}
