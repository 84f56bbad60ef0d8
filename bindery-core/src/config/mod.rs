//! Configuration structs. All defaults live in [`defaults`]; nothing here
//! reads the environment.

pub mod defaults;

mod assembly_config;
mod cache_config;
mod priority_config;
mod provenance_config;

pub use assembly_config::{AssemblyConfig, CountingMethod};
pub use cache_config::{CacheConfig, EvictionPolicy, StorageTier};
pub use priority_config::PriorityConfig;
pub use provenance_config::ProvenanceConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration passed at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderyConfig {
    pub priority: PriorityConfig,
    pub cache: CacheConfig,
    pub provenance: ProvenanceConfig,
    pub assembly: AssemblyConfig,
}
