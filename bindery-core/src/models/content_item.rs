use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a content item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Memory,
    Knowledge,
    Realtime,
    AgentSpecific,
}

impl ContentType {
    /// Stable section name used in packs and breakdowns.
    pub fn section_name(self) -> &'static str {
        match self {
            ContentType::Memory => "memory",
            ContentType::Knowledge => "knowledge",
            ContentType::Realtime => "realtime",
            ContentType::AgentSpecific => "agent_specific",
        }
    }
}

/// Closed set of scalar/structured metadata values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

/// Locator for the adapter that produced an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocator {
    /// Stable id of the originating source.
    pub source_id: String,
    /// Adapter name (e.g. "memory-store", "knowledge-base").
    pub adapter: String,
    /// Opaque locator within the source (path, row id, URL).
    pub locator: String,
}

/// Descriptive metadata attached by the source adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMetadata {
    pub category: String,
    pub tags: Vec<String>,
    /// e.g. "issue-critical", "project", "general".
    pub scope: String,
    pub difficulty: Option<String>,
    /// Extension map for adapter-specific fields.
    pub extra: HashMap<String, MetaValue>,
}

/// Historical usage metrics reported by the source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMetrics {
    pub usage_count: u64,
    /// Fraction of uses that succeeded, [0.0, 1.0].
    pub success_rate: f64,
    /// [0.0, 1.0].
    pub effectiveness: f64,
    /// [0.0, 5.0].
    pub rating: f64,
    pub last_used: Option<DateTime<Utc>>,
    /// [0.0, 1.0].
    pub context_relevance: f64,
}

/// Derived content features. `complexity`, `freshness`, and `similarity`
/// are filled in by the prioritizer; the rest come from the source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFeatures {
    pub word_count: usize,
    pub code_block_count: usize,
    pub technical_terms: usize,
    /// [0.0, 1.0].
    pub complexity: f64,
    /// [0.0, 1.0].
    pub freshness: f64,
    /// [0.0, 1.0].
    pub similarity: f64,
    pub dependencies: Vec<String>,
}

/// One unit of candidate content produced by a source adapter.
///
/// Read-only downstream of the adapter; the core never persists these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub content_type: ContentType,
    pub content: String,
    pub source: SourceLocator,
    pub timestamp: DateTime<Utc>,
    pub metadata: ItemMetadata,
    pub metrics: ItemMetrics,
    pub features: ItemFeatures,
}

impl ContentItem {
    /// Age of the item in fractional days at `now`.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.timestamp).num_seconds().max(0) as f64 / 86_400.0
    }

    /// An item the budget manager must never drop: top priority scope.
    pub fn is_essential(&self) -> bool {
        self.metadata.scope == "issue-critical"
    }

    /// blake3 hex hash of the content body.
    pub fn content_hash(&self) -> String {
        blake3::hash(self.content.as_bytes()).to_hex().to_string()
    }
}
