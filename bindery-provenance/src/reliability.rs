//! Source reliability scoring.

use bindery_core::models::provenance::SourceType;

/// Adjusted reliability: type baseline + 0.1 if validated + 0.2 if
/// authoritative − min(0.3, age_days/100), clamped to [0.1, 1.0].
pub fn adjusted_reliability(
    source_type: SourceType,
    validated: bool,
    authoritative: bool,
    age_days: f64,
) -> f64 {
    let mut score = source_type.baseline_reliability();
    if validated {
        score += 0.1;
    }
    if authoritative {
        score += 0.2;
    }
    score -= (age_days.max(0.0) / 100.0).min(0.3);
    score.clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_knowledge_source_loses_full_age_penalty() {
        // 200-day-old knowledge source: 0.8 - min(0.3, 2.0) = 0.5.
        let r = adjusted_reliability(SourceType::Knowledge, false, false, 200.0);
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn validated_authoritative_memory_caps_at_one() {
        let r = adjusted_reliability(SourceType::Memory, true, true, 0.0);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn floor_is_point_one() {
        let r = adjusted_reliability(SourceType::Realtime, false, false, 10_000.0);
        assert!(r >= 0.1);
    }
}
