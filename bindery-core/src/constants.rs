/// Bindery system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Freshness window: items older than this score zero freshness.
pub const FRESHNESS_WINDOW_DAYS: f64 = 90.0;

/// Minimum token length considered by the Jaccard similarity tokenizer.
pub const SIMILARITY_MIN_TOKEN_LEN: usize = 3;

/// Usage count at which the frequency factor saturates.
pub const FREQUENCY_SATURATION: f64 = 50.0;

/// Audit log hard cap; trimming keeps the newest half.
pub const AUDIT_LOG_CAP: usize = 10_000;
pub const AUDIT_LOG_TRIM_TO: usize = 5_000;

/// Rolling cache operation log cap.
pub const CACHE_OP_LOG_CAP: usize = 1_000;

/// Eviction reduces total cache size to this fraction of capacity.
pub const EVICTION_TARGET_RATIO: f64 = 0.8;

/// Transparency ring buffer: number of recent assemblies retained.
pub const TRANSPARENCY_RING_CAP: usize = 100;
