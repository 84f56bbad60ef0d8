use serde::{Deserialize, Serialize};

use super::defaults;

/// How the budget manager counts content size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountingMethod {
    #[default]
    Characters,
    Words,
    /// Counting goes through an externally supplied `TokenCounter`.
    External,
}

/// Assembler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub counting_method: CountingMethod,
    /// Budget applied when a request does not carry one.
    pub default_budget_limit: usize,
    /// Assemblies slower than this raise a non-fatal performance warning.
    pub performance_ceiling_ms: u64,
    /// Hard deadline for one assembly, checked at stage boundaries.
    pub assembly_timeout_ms: u64,
    /// Version component of the cache key.
    pub pack_version: String,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            counting_method: CountingMethod::default(),
            default_budget_limit: defaults::DEFAULT_BUDGET_LIMIT,
            performance_ceiling_ms: defaults::DEFAULT_PERFORMANCE_CEILING_MS,
            assembly_timeout_ms: defaults::DEFAULT_ASSEMBLY_TIMEOUT_MS,
            pack_version: defaults::DEFAULT_PACK_VERSION.to_string(),
        }
    }
}
