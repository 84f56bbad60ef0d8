use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Which tier(s) back the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageTier {
    Memory,
    File,
    /// Memory hot layer backed by a durable file layer; file hits promote.
    #[default]
    Hybrid,
}

/// Rule for choosing eviction candidates when capacity is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    #[default]
    Lru,
    Lfu,
    /// Earliest expiry first.
    Ttl,
    Random,
}

/// Cache engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub tier: StorageTier,
    pub eviction_policy: EvictionPolicy,
    /// Capacity in bytes across all entries.
    pub max_size_bytes: u64,
    /// Default TTL applied when `set` is not given one.
    pub default_ttl_secs: u64,
    /// Interval between background expiry sweeps.
    pub sweep_interval_secs: u64,
    /// Entries examined per sweep batch before yielding the map.
    pub sweep_batch: usize,
    /// Base directory for the file tier (one file per key).
    pub base_dir: PathBuf,
    /// Deadline for a single file-tier operation.
    pub file_op_timeout_ms: u64,
    /// Backoff before the single file-tier retry.
    pub file_retry_backoff_ms: u64,
    /// Values at or above this serialized size are zstd-compressed.
    /// `None` disables the compression hook.
    pub compression_threshold_bytes: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tier: StorageTier::default(),
            eviction_policy: EvictionPolicy::default(),
            max_size_bytes: defaults::DEFAULT_CACHE_MAX_SIZE_BYTES,
            default_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            sweep_interval_secs: defaults::DEFAULT_SWEEP_INTERVAL_SECS,
            sweep_batch: defaults::DEFAULT_SWEEP_BATCH,
            base_dir: PathBuf::from(".bindery-cache"),
            file_op_timeout_ms: defaults::DEFAULT_FILE_OP_TIMEOUT_MS,
            file_retry_backoff_ms: defaults::DEFAULT_FILE_RETRY_BACKOFF_MS,
            compression_threshold_bytes: Some(defaults::DEFAULT_COMPRESSION_THRESHOLD_BYTES),
        }
    }
}
