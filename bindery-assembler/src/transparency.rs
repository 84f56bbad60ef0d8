//! Assembly transparency log.
//!
//! Keeps a bounded ring of recent assembly records and answers "why"
//! queries against it. The ring holds the last 100 assemblies; older
//! records fall off silently.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bindery_core::constants::TRANSPARENCY_RING_CAP;
use bindery_core::models::{OptimizationRecord, PackWarning};

/// Why one item made it into a pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemExplanation {
    pub item_id: String,
    pub rank: usize,
    pub score: f64,
    pub reasoning: String,
}

/// Everything remembered about a single assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyRecord {
    pub pack_id: String,
    pub issue_id: String,
    pub agent_type: String,
    pub created_at: DateTime<Utc>,
    pub strategy: String,
    pub cache_used: bool,
    pub duration_ms: u64,
    pub items: Vec<ItemExplanation>,
    pub optimizations: Vec<OptimizationRecord>,
    pub warnings: Vec<PackWarning>,
}

/// Answer to a why query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyReport {
    pub pack_id: String,
    pub headline: String,
    pub item_explanations: Vec<ItemExplanation>,
    pub optimization_notes: Vec<String>,
    pub warning_notes: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TransparencyLog {
    records: Mutex<VecDeque<AssemblyRecord>>,
}

impl TransparencyLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: AssemblyRecord) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        if records.len() >= TRANSPARENCY_RING_CAP {
            records.pop_front();
        }
        records.push_back(record);
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(records) => records.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a why query. The query matches a record by pack id, issue
    /// id, or agent type; the most recent match wins.
    pub fn process_why_command(&self, query: &str) -> Option<TransparencyReport> {
        let records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        let record = records.iter().rev().find(|record| {
            record.pack_id == query || record.issue_id == query || record.agent_type == query
        })?;
        Some(build_report(record))
    }
}

fn build_report(record: &AssemblyRecord) -> TransparencyReport {
    let headline = format!(
        "pack {} for issue {} (agent {}): {} items via `{}` strategy, {}, assembled in {}ms",
        record.pack_id,
        record.issue_id,
        record.agent_type,
        record.items.len(),
        record.strategy,
        if record.cache_used {
            "served from cache"
        } else {
            "assembled fresh"
        },
        record.duration_ms,
    );

    let optimization_notes = record
        .optimizations
        .iter()
        .map(|opt| format!("{} (saved {} units)", opt.description, opt.units_saved))
        .collect();

    let warning_notes = record
        .warnings
        .iter()
        .map(|warning| format!("[{}] {}", warning.warning_type, warning.message))
        .collect();

    TransparencyReport {
        pack_id: record.pack_id.clone(),
        headline,
        item_explanations: record.items.clone(),
        optimization_notes,
        warning_notes,
    }
}
