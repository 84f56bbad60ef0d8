//! Public request/response surface of the assembler.

use serde::{Deserialize, Serialize};

use bindery_core::models::context_pack::ContextPack;
use bindery_core::models::prioritization::PrioritizationContext;
use bindery_core::models::warning::PackWarning;

use crate::stages::AssemblyStage;

/// One assembly request from the agent orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyRequest {
    pub issue_id: String,
    pub agent_type: String,
    pub description: String,
    pub project: String,
    pub history: Vec<String>,
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub preferences: Vec<String>,
    /// Falls back to the configured default budget.
    pub budget_limit: Option<usize>,
    /// Skip the cache check (the fresh result is still cached afterward).
    pub force_refresh: bool,
    /// Optional strategy name; defaults to the configured strategy.
    pub strategy: Option<String>,
}

impl AssemblyRequest {
    pub fn to_context(&self) -> PrioritizationContext {
        PrioritizationContext {
            issue_id: self.issue_id.clone(),
            agent_type: self.agent_type.clone(),
            description: self.description.clone(),
            project: self.project.clone(),
            history: self.history.clone(),
            goals: self.goals.clone(),
            constraints: self.constraints.clone(),
            preferences: self.preferences.clone(),
        }
    }
}

/// Timing and volume figures for one assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackPerformance {
    pub duration_ms: u64,
    pub stage_reached: AssemblyStage,
    pub items_gathered: usize,
    pub items_included: usize,
}

/// What `assemble_context_pack` returns. Always structurally valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyResponse {
    pub context_pack: ContextPack,
    pub performance: PackPerformance,
    pub cache_used: bool,
    pub warnings: Vec<PackWarning>,
}
