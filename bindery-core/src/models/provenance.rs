use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source type, ordered by baseline reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Memory,
    Knowledge,
    Index,
    Retrieval,
    Realtime,
}

impl SourceType {
    /// Baseline reliability before validation/authority/age adjustments.
    pub fn baseline_reliability(self) -> f64 {
        match self {
            SourceType::Memory => 0.9,
            SourceType::Knowledge => 0.8,
            SourceType::Index => 0.7,
            SourceType::Retrieval => 0.6,
            SourceType::Realtime => 0.5,
        }
    }
}

/// Immutable record of one registered source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRegistration {
    pub id: String,
    pub session_id: String,
    pub source_type: SourceType,
    pub locator: String,
    pub validated: bool,
    pub authoritative: bool,
    pub age_days: f64,
    /// Adjusted reliability, [0.1, 1.0].
    pub reliability: f64,
    pub registered_at: DateTime<Utc>,
}

/// Kinds of transformation applied to content during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationKind {
    Filter,
    Prioritize,
    Truncate,
    Summarize,
    Compress,
    Eliminate,
}

impl TransformationKind {
    /// Only filter and prioritize can be undone without information loss.
    pub fn is_reversible(self) -> bool {
        matches!(self, TransformationKind::Filter | TransformationKind::Prioritize)
    }
}

/// Immutable record of one transformation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationRecord {
    pub id: String,
    pub session_id: String,
    pub kind: TransformationKind,
    pub description: String,
    pub input_ids: Vec<String>,
    pub output_ids: Vec<String>,
    /// [0.0, 1.0].
    pub confidence: f64,
    pub reversible: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Impact classification for decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionImpact {
    Low,
    Medium,
    High,
}

/// Immutable record of one decision made during assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub session_id: String,
    pub description: String,
    pub rationale: String,
    /// [0.0, 1.0].
    pub confidence: f64,
    pub impact: DecisionImpact,
    pub recorded_at: DateTime<Utc>,
}

/// Reference from a session to one of its owned records, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum OperationRef {
    Source(String),
    Transformation(String),
    Decision(String),
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    Error,
}

/// One assembly's provenance session. Owns its records in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSession {
    pub id: String,
    pub pack_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub operations: Vec<OperationRef>,
    pub status: SessionStatus,
}

/// Provenance summary embedded into a returned pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvenanceInfo {
    pub session_id: String,
    pub source_count: usize,
    pub transformation_count: usize,
    pub decision_count: usize,
    /// [0, 100].
    pub trust_score: u8,
    /// Source ids in registration order.
    pub sources: Vec<String>,
}

/// Result of referential-consistency verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub valid: bool,
    pub issues: Vec<String>,
}
