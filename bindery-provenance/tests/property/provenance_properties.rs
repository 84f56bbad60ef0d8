use proptest::prelude::*;

use bindery_core::config::ProvenanceConfig;
use bindery_core::models::provenance::{SessionStatus, SourceType, TransformationKind};
use bindery_provenance::ProvenanceTracker;

fn arb_source() -> impl Strategy<Value = (u8, bool, bool, f64)> {
    (0u8..5, any::<bool>(), any::<bool>(), 0.0f64..400.0)
}

fn source_type(tag: u8) -> SourceType {
    match tag {
        0 => SourceType::Memory,
        1 => SourceType::Knowledge,
        2 => SourceType::Index,
        3 => SourceType::Retrieval,
        _ => SourceType::Realtime,
    }
}

proptest! {
    // ── Trust score stays in [0, 100], 0 only without sources ─────────────
    #[test]
    fn trust_score_bounded(
        sources in prop::collection::vec(arb_source(), 0..8),
        confidences in prop::collection::vec(0.0f64..=1.0, 0..6),
    ) {
        let tracker = ProvenanceTracker::new(ProvenanceConfig::default());
        let session = tracker.start_session("pack-prop");

        for (tag, validated, authoritative, age) in &sources {
            tracker
                .register_source(&session, source_type(*tag), "src://x", *validated, *authoritative, *age)
                .unwrap();
        }
        for confidence in &confidences {
            tracker
                .record_transformation(
                    &session,
                    TransformationKind::Filter,
                    "filtered",
                    Vec::new(),
                    Vec::new(),
                    *confidence,
                )
                .unwrap();
        }
        tracker.end_session(&session, SessionStatus::Completed).unwrap();

        let info = tracker.generate_provenance_info(&session).unwrap();
        prop_assert!(info.trust_score <= 100);
        if sources.is_empty() {
            prop_assert_eq!(info.trust_score, 0);
        }
    }

    // ── Referential integrity holds under arbitrary operation mixes ───────
    #[test]
    fn integrity_verifies_after_any_session(
        sources in prop::collection::vec(arb_source(), 0..5),
        decision_count in 0usize..5,
    ) {
        let tracker = ProvenanceTracker::new(ProvenanceConfig::default());
        let session = tracker.start_session("pack-prop");

        for (tag, validated, authoritative, age) in &sources {
            tracker
                .register_source(&session, source_type(*tag), "src://y", *validated, *authoritative, *age)
                .unwrap();
        }
        for i in 0..decision_count {
            tracker
                .record_decision(&session, &format!("decision {i}"), "generated", 0.8)
                .unwrap();
        }
        tracker.end_session(&session, SessionStatus::Completed).unwrap();

        let report = tracker.verify_integrity();
        prop_assert!(report.valid, "issues: {:?}", report.issues);
    }
}
