use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prioritization::PrioritizedItem;
use super::provenance::ProvenanceInfo;

/// Pack-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMetadata {
    pub pack_id: String,
    pub issue_id: String,
    pub agent_type: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    /// blake3 hex over the gathered input content.
    pub input_content_hash: String,
}

/// Content sections of a pack, grouped by content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSections {
    pub memory: Vec<PrioritizedItem>,
    pub knowledge: Vec<PrioritizedItem>,
    pub realtime: Vec<PrioritizedItem>,
    pub agent_specific: Vec<PrioritizedItem>,
    /// Item-id pairs that reference each other across sections.
    pub cross_references: Vec<(String, String)>,
    /// Executive summary. Carries an `[assembly-error]` marker on degraded packs.
    pub summary: String,
}

impl PackSections {
    /// Total items across the four typed sections.
    pub fn item_count(&self) -> usize {
        self.memory.len() + self.knowledge.len() + self.realtime.len() + self.agent_specific.len()
    }

    /// Iterate all included items.
    pub fn iter_items(&self) -> impl Iterator<Item = &PrioritizedItem> {
        self.memory
            .iter()
            .chain(self.knowledge.iter())
            .chain(self.realtime.iter())
            .chain(self.agent_specific.iter())
    }
}

/// Impact of one budget optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationImpact {
    Low,
    Medium,
    High,
}

/// What the budget manager did to fit an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationKind {
    Truncate,
    SubstituteSummary,
    Compress,
    Eliminate,
}

/// Log entry for one applied optimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub kind: OptimizationKind,
    pub description: String,
    pub units_saved: usize,
    pub impact: OptimizationImpact,
}

/// Budget accounting for a pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub total_tokens: usize,
    pub budget_limit: usize,
    /// total / limit * 100.
    pub utilization: f64,
    /// Tokens per section name.
    pub breakdown: HashMap<String, usize>,
    pub optimizations: Vec<OptimizationRecord>,
}

/// The assembled, immutable context pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPack {
    pub metadata: PackMetadata,
    pub sections: PackSections,
    pub provenance: ProvenanceInfo,
    pub token_usage: TokenUsage,
}
