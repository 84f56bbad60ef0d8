//! ProvenanceTracker: session lifecycle, record registries, trust scoring,
//! and referential integrity verification.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::{debug, info, warn};

use bindery_core::config::ProvenanceConfig;
use bindery_core::errors::{BinderyResult, ProvenanceError};
use bindery_core::models::provenance::{
    DecisionImpact, DecisionRecord, IntegrityReport, OperationRef, ProvenanceInfo, SessionStatus,
    SourceRegistration, SourceType, TrackingSession, TransformationKind, TransformationRecord,
};

use crate::audit::{AuditEntry, AuditLog};
use crate::reliability;

/// Trust score component weights.
const SOURCE_WEIGHT: f64 = 0.5;
const TRANSFORM_WEIGHT: f64 = 0.3;
const DECISION_WEIGHT: f64 = 0.2;

/// Query over tracked sessions. All fields are optional filters.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceQuery {
    pub session_id: Option<String>,
    pub pack_id: Option<String>,
    pub status: Option<SessionStatus>,
}

/// One session with its owned records, for export.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionExport {
    pub session: TrackingSession,
    pub sources: Vec<SourceRegistration>,
    pub transformations: Vec<TransformationRecord>,
    pub decisions: Vec<DecisionRecord>,
}

/// Concurrent provenance tracker. Each assembly owns one session; many
/// sessions may be active at once.
pub struct ProvenanceTracker {
    config: ProvenanceConfig,
    sessions: DashMap<String, TrackingSession>,
    sources: DashMap<String, SourceRegistration>,
    transformations: DashMap<String, TransformationRecord>,
    decisions: DashMap<String, DecisionRecord>,
    audit: AuditLog,
}

impl ProvenanceTracker {
    pub fn new(config: ProvenanceConfig) -> Self {
        let audit = AuditLog::new(config.audit_log_cap, config.audit_log_trim_to);
        Self {
            config,
            sessions: DashMap::new(),
            sources: DashMap::new(),
            transformations: DashMap::new(),
            decisions: DashMap::new(),
            audit,
        }
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    /// Open a session for one assembly. Returns the session id.
    pub fn start_session(&self, pack_id: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let session = TrackingSession {
            id: id.clone(),
            pack_id: pack_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            operations: Vec::new(),
            status: SessionStatus::Active,
        };
        self.sessions.insert(id.clone(), session);
        self.log("start_session", &format!("pack {pack_id}"), "low");
        debug!(session_id = %id, pack_id, "provenance session started");
        id
    }

    /// Register one queried source with the session.
    #[allow(clippy::too_many_arguments)]
    pub fn register_source(
        &self,
        session_id: &str,
        source_type: SourceType,
        locator: &str,
        validated: bool,
        authoritative: bool,
        age_days: f64,
    ) -> BinderyResult<SourceRegistration> {
        let registration = SourceRegistration {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            source_type,
            locator: locator.to_string(),
            validated,
            authoritative,
            age_days,
            reliability: reliability::adjusted_reliability(
                source_type,
                validated,
                authoritative,
                age_days,
            ),
            registered_at: Utc::now(),
        };
        self.append_operation(session_id, OperationRef::Source(registration.id.clone()))?;
        self.sources
            .insert(registration.id.clone(), registration.clone());
        self.log(
            "register_source",
            &format!("{locator} ({source_type:?}), reliability {:.2}", registration.reliability),
            "low",
        );
        Ok(registration)
    }

    /// Record one content transformation.
    pub fn record_transformation(
        &self,
        session_id: &str,
        kind: TransformationKind,
        description: &str,
        input_ids: Vec<String>,
        output_ids: Vec<String>,
        confidence: f64,
    ) -> BinderyResult<TransformationRecord> {
        let record = TransformationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            kind,
            description: description.to_string(),
            input_ids,
            output_ids,
            confidence: confidence.clamp(0.0, 1.0),
            reversible: kind.is_reversible(),
            recorded_at: Utc::now(),
        };
        self.append_operation(
            session_id,
            OperationRef::Transformation(record.id.clone()),
        )?;
        self.transformations.insert(record.id.clone(), record.clone());
        self.log("record_transformation", description, "medium");
        Ok(record)
    }

    /// Record one assembly decision; impact is classified from confidence
    /// and wording.
    pub fn record_decision(
        &self,
        session_id: &str,
        description: &str,
        rationale: &str,
        confidence: f64,
    ) -> BinderyResult<DecisionRecord> {
        let impact = classify_impact(description, rationale, confidence);
        let record = DecisionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            description: description.to_string(),
            rationale: rationale.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            impact,
            recorded_at: Utc::now(),
        };
        self.append_operation(session_id, OperationRef::Decision(record.id.clone()))?;
        self.decisions.insert(record.id.clone(), record.clone());
        let impact_str = match impact {
            DecisionImpact::Low => "low",
            DecisionImpact::Medium => "medium",
            DecisionImpact::High => "high",
        };
        self.log("record_decision", description, impact_str);
        Ok(record)
    }

    /// Close a session with the given terminal status.
    pub fn end_session(&self, session_id: &str, status: SessionStatus) -> BinderyResult<()> {
        let mut session =
            self.sessions
                .get_mut(session_id)
                .ok_or_else(|| ProvenanceError::SessionNotFound {
                    session_id: session_id.to_string(),
                })?;
        session.ended_at = Some(Utc::now());
        session.status = status;
        self.log("end_session", &format!("status {status:?}"), "low");
        info!(session_id, ?status, operations = session.operations.len(), "provenance session ended");
        Ok(())
    }

    /// Summary embedded into the returned pack.
    pub fn generate_provenance_info(&self, session_id: &str) -> BinderyResult<ProvenanceInfo> {
        let session =
            self.sessions
                .get(session_id)
                .ok_or_else(|| ProvenanceError::SessionNotFound {
                    session_id: session_id.to_string(),
                })?;

        let mut sources = Vec::new();
        let mut transformation_count = 0;
        let mut decision_count = 0;
        for op in &session.operations {
            match op {
                OperationRef::Source(id) => sources.push(id.clone()),
                OperationRef::Transformation(_) => transformation_count += 1,
                OperationRef::Decision(_) => decision_count += 1,
            }
        }

        Ok(ProvenanceInfo {
            session_id: session_id.to_string(),
            source_count: sources.len(),
            transformation_count,
            decision_count,
            trust_score: self.trust_score(&session),
            sources,
        })
    }

    /// Trust score in [0, 100]: weighted average of source reliability,
    /// transformation confidence, and decision confidence. Components with
    /// no records drop out and the remaining weights renormalize; no
    /// sources means 0.
    fn trust_score(&self, session: &TrackingSession) -> u8 {
        let mut source_scores = Vec::new();
        let mut transform_scores = Vec::new();
        let mut decision_scores = Vec::new();
        for op in &session.operations {
            match op {
                OperationRef::Source(id) => {
                    if let Some(s) = self.sources.get(id) {
                        source_scores.push(s.reliability);
                    }
                }
                OperationRef::Transformation(id) => {
                    if let Some(t) = self.transformations.get(id) {
                        transform_scores.push(t.confidence);
                    }
                }
                OperationRef::Decision(id) => {
                    if let Some(d) = self.decisions.get(id) {
                        decision_scores.push(d.confidence);
                    }
                }
            }
        }

        if source_scores.is_empty() {
            return 0;
        }

        let avg = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
        let mut weighted = avg(&source_scores) * SOURCE_WEIGHT;
        let mut weight_sum = SOURCE_WEIGHT;
        if !transform_scores.is_empty() {
            weighted += avg(&transform_scores) * TRANSFORM_WEIGHT;
            weight_sum += TRANSFORM_WEIGHT;
        }
        if !decision_scores.is_empty() {
            weighted += avg(&decision_scores) * DECISION_WEIGHT;
            weight_sum += DECISION_WEIGHT;
        }

        ((weighted / weight_sum * 100.0).round().clamp(0.0, 100.0)) as u8
    }

    /// Serialize one session and all of its owned records to JSON.
    pub fn export_session(&self, session_id: &str) -> BinderyResult<String> {
        let session = self
            .sessions
            .get(session_id)
            .map(|s| s.clone())
            .ok_or_else(|| ProvenanceError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;

        let mut sources = Vec::new();
        let mut transformations = Vec::new();
        let mut decisions = Vec::new();
        for op in &session.operations {
            match op {
                OperationRef::Source(id) => {
                    if let Some(s) = self.sources.get(id) {
                        sources.push(s.clone());
                    }
                }
                OperationRef::Transformation(id) => {
                    if let Some(t) = self.transformations.get(id) {
                        transformations.push(t.clone());
                    }
                }
                OperationRef::Decision(id) => {
                    if let Some(d) = self.decisions.get(id) {
                        decisions.push(d.clone());
                    }
                }
            }
        }

        let export = SessionExport {
            session,
            sources,
            transformations,
            decisions,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Filtered session snapshots.
    pub fn query_provenance(&self, query: &ProvenanceQuery) -> Vec<TrackingSession> {
        self.sessions
            .iter()
            .filter(|s| {
                query
                    .session_id
                    .as_ref()
                    .map_or(true, |id| &s.id == id)
                    && query.pack_id.as_ref().map_or(true, |id| &s.pack_id == id)
                    && query.status.map_or(true, |st| s.status == st)
            })
            .map(|s| s.clone())
            .collect()
    }

    /// Source registrations owned by a session, in registration order.
    pub fn sources_for_session(&self, session_id: &str) -> Vec<SourceRegistration> {
        let Some(session) = self.sessions.get(session_id) else {
            return Vec::new();
        };
        session
            .operations
            .iter()
            .filter_map(|op| match op {
                OperationRef::Source(id) => self.sources.get(id).map(|s| s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check that every operation reference resolves to a live record and
    /// every record points back to its owning session.
    pub fn verify_integrity(&self) -> IntegrityReport {
        let mut issues = Vec::new();

        for session in self.sessions.iter() {
            for op in &session.operations {
                let (found, kind, id) = match op {
                    OperationRef::Source(id) => (self.sources.contains_key(id), "source", id),
                    OperationRef::Transformation(id) => {
                        (self.transformations.contains_key(id), "transformation", id)
                    }
                    OperationRef::Decision(id) => (self.decisions.contains_key(id), "decision", id),
                };
                if !found {
                    issues.push(format!(
                        "session {} references missing {kind} {id}",
                        session.id
                    ));
                }
            }
        }

        for source in self.sources.iter() {
            if !self.sessions.contains_key(&source.session_id) {
                issues.push(format!(
                    "source {} references missing session {}",
                    source.id, source.session_id
                ));
            }
        }
        for t in self.transformations.iter() {
            if !self.sessions.contains_key(&t.session_id) {
                issues.push(format!(
                    "transformation {} references missing session {}",
                    t.id, t.session_id
                ));
            }
        }
        for d in self.decisions.iter() {
            if !self.sessions.contains_key(&d.session_id) {
                issues.push(format!(
                    "decision {} references missing session {}",
                    d.id, d.session_id
                ));
            }
        }

        if !issues.is_empty() {
            warn!(issues = issues.len(), "provenance integrity issues found");
        }
        IntegrityReport {
            valid: issues.is_empty(),
            issues,
        }
    }

    /// Remove completed/error sessions older than the configured age,
    /// together with their owned records. Returns removed session count.
    pub fn gc_sessions(&self) -> usize {
        let cutoff = Utc::now() - Duration::seconds(self.config.session_max_age_secs as i64);
        let stale: Vec<String> = self
            .sessions
            .iter()
            .filter(|s| {
                s.status != SessionStatus::Active
                    && s.ended_at.map(|t| t < cutoff).unwrap_or(false)
            })
            .map(|s| s.id.clone())
            .collect();

        for id in &stale {
            if let Some((_, session)) = self.sessions.remove(id) {
                for op in &session.operations {
                    match op {
                        OperationRef::Source(rid) => {
                            self.sources.remove(rid);
                        }
                        OperationRef::Transformation(rid) => {
                            self.transformations.remove(rid);
                        }
                        OperationRef::Decision(rid) => {
                            self.decisions.remove(rid);
                        }
                    }
                }
            }
        }
        if !stale.is_empty() {
            info!(removed = stale.len(), "stale provenance sessions collected");
        }
        stale.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn append_operation(&self, session_id: &str, op: OperationRef) -> BinderyResult<()> {
        let mut session =
            self.sessions
                .get_mut(session_id)
                .ok_or_else(|| ProvenanceError::SessionNotFound {
                    session_id: session_id.to_string(),
                })?;
        if session.status != SessionStatus::Active {
            return Err(ProvenanceError::SessionNotActive {
                session_id: session_id.to_string(),
            }
            .into());
        }
        session.operations.push(op);
        Ok(())
    }

    fn log(&self, action: &str, details: &str, impact: &str) {
        self.audit.append(AuditEntry {
            timestamp: Utc::now(),
            actor: "provenance-tracker".to_string(),
            action: action.to_string(),
            details: details.to_string(),
            impact: impact.to_string(),
        });
    }
}

/// Decision impact rules: low confidence or destructive wording is high,
/// ordering/optimization wording is medium, everything else low.
fn classify_impact(description: &str, rationale: &str, confidence: f64) -> DecisionImpact {
    let text = format!("{description} {rationale}").to_lowercase();
    if confidence < 0.5 || text.contains("remove") || text.contains("exclude") {
        DecisionImpact::High
    } else if text.contains("prioritize") || text.contains("optimize") {
        DecisionImpact::Medium
    } else {
        DecisionImpact::Low
    }
}
