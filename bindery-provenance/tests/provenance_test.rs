use bindery_core::config::ProvenanceConfig;
use bindery_core::models::provenance::{SessionStatus, SourceType, TransformationKind};
use bindery_provenance::{ProvenanceQuery, ProvenanceTracker};

fn tracker() -> ProvenanceTracker {
    ProvenanceTracker::new(ProvenanceConfig::default())
}

// ── Session lifecycle ─────────────────────────────────────────────────────

#[test]
fn full_session_produces_consistent_provenance_info() {
    let t = tracker();
    let session = t.start_session("pack-1");

    t.register_source(&session, SourceType::Memory, "mem://recent", true, false, 5.0)
        .unwrap();
    t.register_source(&session, SourceType::Knowledge, "kb://patterns", false, true, 30.0)
        .unwrap();
    t.record_transformation(
        &session,
        TransformationKind::Prioritize,
        "ranked 12 items",
        vec!["a".into(), "b".into()],
        vec!["b".into(), "a".into()],
        0.9,
    )
    .unwrap();
    t.record_decision(&session, "include top 6 items", "fits budget", 0.8)
        .unwrap();
    t.end_session(&session, SessionStatus::Completed).unwrap();

    let info = t.generate_provenance_info(&session).unwrap();
    assert_eq!(info.source_count, 2);
    assert_eq!(info.transformation_count, 1);
    assert_eq!(info.decision_count, 1);
    assert!(info.trust_score > 0 && info.trust_score <= 100);
}

#[test]
fn recording_into_ended_session_fails() {
    let t = tracker();
    let session = t.start_session("pack-1");
    t.end_session(&session, SessionStatus::Completed).unwrap();
    let err = t.record_decision(&session, "late decision", "", 0.9);
    assert!(err.is_err());
}

#[test]
fn unknown_session_is_an_error() {
    let t = tracker();
    assert!(t.end_session("nope", SessionStatus::Completed).is_err());
    assert!(t.generate_provenance_info("nope").is_err());
}

// ── Trust score ───────────────────────────────────────────────────────────

#[test]
fn trust_score_is_zero_without_sources() {
    let t = tracker();
    let session = t.start_session("pack-1");
    t.record_decision(&session, "no sources available", "degraded", 0.9)
        .unwrap();
    let info = t.generate_provenance_info(&session).unwrap();
    assert_eq!(info.trust_score, 0);
}

#[test]
fn trust_score_reflects_component_averages() {
    let t = tracker();
    let session = t.start_session("pack-1");
    // Fresh validated+authoritative memory source clamps to reliability 1.0.
    t.register_source(&session, SourceType::Memory, "mem://a", true, true, 0.0)
        .unwrap();
    t.record_transformation(
        &session,
        TransformationKind::Filter,
        "filtered",
        vec![],
        vec![],
        1.0,
    )
    .unwrap();
    t.record_decision(&session, "include all", "", 1.0).unwrap();
    let info = t.generate_provenance_info(&session).unwrap();
    assert_eq!(info.trust_score, 100);
}

#[test]
fn aged_source_reliability_matches_formula() {
    let t = tracker();
    let session = t.start_session("pack-1");
    let reg = t
        .register_source(&session, SourceType::Knowledge, "kb://old", false, false, 200.0)
        .unwrap();
    assert!((reg.reliability - 0.5).abs() < 1e-12);
}

// ── Transformations ───────────────────────────────────────────────────────

#[test]
fn only_filter_and_prioritize_are_reversible() {
    let t = tracker();
    let session = t.start_session("pack-1");
    let cases = [
        (TransformationKind::Filter, true),
        (TransformationKind::Prioritize, true),
        (TransformationKind::Truncate, false),
        (TransformationKind::Summarize, false),
        (TransformationKind::Compress, false),
        (TransformationKind::Eliminate, false),
    ];
    for (kind, reversible) in cases {
        let record = t
            .record_transformation(&session, kind, "t", vec![], vec![], 0.9)
            .unwrap();
        assert_eq!(record.reversible, reversible, "{kind:?}");
    }
}

// ── Integrity, audit, query, GC ───────────────────────────────────────────

#[test]
fn verify_integrity_passes_on_consistent_state() {
    let t = tracker();
    let session = t.start_session("pack-1");
    t.register_source(&session, SourceType::Index, "idx://x", false, false, 1.0)
        .unwrap();
    let report = t.verify_integrity();
    assert!(report.valid, "unexpected issues: {:?}", report.issues);
}

#[test]
fn every_mutation_is_double_logged() {
    let t = tracker();
    let session = t.start_session("pack-1");
    t.register_source(&session, SourceType::Memory, "mem://a", false, false, 0.0)
        .unwrap();
    t.record_decision(&session, "include", "", 0.9).unwrap();
    t.end_session(&session, SessionStatus::Completed).unwrap();
    // start + register + decision + end.
    assert_eq!(t.audit_log().len(), 4);
}

#[test]
fn query_filters_by_pack_and_status() {
    let t = tracker();
    let s1 = t.start_session("pack-1");
    let _s2 = t.start_session("pack-2");
    t.end_session(&s1, SessionStatus::Completed).unwrap();

    let completed = t.query_provenance(&ProvenanceQuery {
        status: Some(SessionStatus::Completed),
        ..ProvenanceQuery::default()
    });
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].pack_id, "pack-1");

    let by_pack = t.query_provenance(&ProvenanceQuery {
        pack_id: Some("pack-2".to_string()),
        ..ProvenanceQuery::default()
    });
    assert_eq!(by_pack.len(), 1);
}

#[test]
fn gc_removes_old_completed_sessions_only() {
    let config = ProvenanceConfig {
        session_max_age_secs: 0,
        ..ProvenanceConfig::default()
    };
    let t = ProvenanceTracker::new(config);
    let done = t.start_session("pack-done");
    t.end_session(&done, SessionStatus::Completed).unwrap();
    let _active = t.start_session("pack-active");

    std::thread::sleep(std::time::Duration::from_millis(5));
    let removed = t.gc_sessions();
    assert_eq!(removed, 1);
    assert_eq!(t.session_count(), 1);
}

#[test]
fn export_bundles_session_records_as_json() {
    let t = tracker();
    let session = t.start_session("pack-export");
    t.register_source(&session, SourceType::Memory, "mem://recent", true, false, 2.0)
        .unwrap();
    t.record_decision(&session, "include top items", "fits budget", 0.9)
        .unwrap();
    t.end_session(&session, SessionStatus::Completed).unwrap();

    let json = t.export_session(&session).unwrap();
    let export: bindery_provenance::SessionExport = serde_json::from_str(&json).unwrap();
    assert_eq!(export.session.pack_id, "pack-export");
    assert_eq!(export.sources.len(), 1);
    assert_eq!(export.decisions.len(), 1);
    assert!(export.transformations.is_empty());

    assert!(t.export_session("missing").is_err());
}
