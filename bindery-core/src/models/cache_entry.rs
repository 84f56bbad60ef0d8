use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bookkeeping carried by every cache entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub ttl_secs: u64,
    /// Serialized (post-hook) size in bytes.
    pub size_bytes: u64,
    pub compressed: bool,
    /// blake3 hex of the serialized value.
    pub content_hash: String,
}

/// One cached value with metadata, tags, and dependency ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    pub metadata: EntryMetadata,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
}

impl<T> CacheEntry<T> {
    /// Valid iff `now < created_at + ttl`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        let ttl = Duration::seconds(self.metadata.ttl_secs as i64);
        now < self.metadata.created_at + ttl
    }

    /// Expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.metadata.created_at + Duration::seconds(self.metadata.ttl_secs as i64)
    }

    /// Record a hit.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.metadata.last_accessed = now;
        self.metadata.access_count += 1;
    }
}

/// Record of one pattern-based invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidationContext {
    /// The pattern that triggered the invalidation.
    pub trigger: String,
    pub affected_keys: Vec<String>,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate cache statistics derived from the rolling op log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// [0.0, 1.0].
    pub hit_rate: f64,
    pub evictions: u64,
    pub entry_count: usize,
    pub size_bytes: u64,
    /// size / capacity, [0.0, 1.0+].
    pub utilization: f64,
    pub avg_retrieval_ms: f64,
}
