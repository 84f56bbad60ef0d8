//! Assembly pipeline state machine. Stage order is strict; the only
//! permitted deviation is the cache-check bypass under forced refresh.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssemblyStage {
    Received,
    SourcesGathered,
    Prioritized,
    BudgetEnforced,
    CacheChecked,
    Assembled,
    Cached,
    Returned,
    /// Terminal, reachable from any stage.
    Error,
}

impl fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyStage::Received => "received",
            AssemblyStage::SourcesGathered => "sources-gathered",
            AssemblyStage::Prioritized => "prioritized",
            AssemblyStage::BudgetEnforced => "budget-enforced",
            AssemblyStage::CacheChecked => "cache-checked",
            AssemblyStage::Assembled => "assembled",
            AssemblyStage::Cached => "cached",
            AssemblyStage::Returned => "returned",
            AssemblyStage::Error => "error",
        };
        f.write_str(name)
    }
}
