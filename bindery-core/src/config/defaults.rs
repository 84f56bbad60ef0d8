//! Every configurable default in one place.

/// Prioritization.
pub const DEFAULT_STRATEGY: &str = "hybrid";
pub const DEFAULT_ML_RANKING_ENABLED: bool = true;
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Cache.
pub const DEFAULT_CACHE_MAX_SIZE_BYTES: u64 = 64 * 1024 * 1024;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_SWEEP_BATCH: usize = 256;
pub const DEFAULT_FILE_OP_TIMEOUT_MS: u64 = 250;
pub const DEFAULT_FILE_RETRY_BACKOFF_MS: u64 = 20;
pub const DEFAULT_COMPRESSION_THRESHOLD_BYTES: usize = 4_096;

/// Provenance.
pub const DEFAULT_SESSION_MAX_AGE_SECS: u64 = 24 * 3_600;

/// Assembly.
pub const DEFAULT_BUDGET_LIMIT: usize = 8_000;
pub const DEFAULT_PERFORMANCE_CEILING_MS: u64 = 1_000;
pub const DEFAULT_ASSEMBLY_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PACK_VERSION: &str = "1";
