//! CacheEngine: tiered get/set/delete/invalidate/clear/exists/stats.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use bindery_core::config::{CacheConfig, StorageTier};
use bindery_core::constants::EVICTION_TARGET_RATIO;
use bindery_core::errors::BinderyResult;
use bindery_core::models::cache_entry::{
    CacheEntry, CacheStats, EntryMetadata, InvalidationContext,
};
use bindery_core::traits::ValueTransform;

use crate::codec;
use crate::eviction::{self, Candidate};
use crate::file_tier::{FileTier, StoredEnvelope};
use crate::invalidation;
use crate::stats::{OpKind, OpLog};

/// Tiered cache keyed by content-addressed strings.
///
/// The index map always holds entry metadata; payload bytes live in the map
/// for the memory and hybrid tiers and on disk for the file and hybrid
/// tiers. File failures degrade to misses and never propagate.
pub struct CacheEngine<T> {
    config: CacheConfig,
    index: DashMap<String, CacheEntry<Vec<u8>>>,
    file: Option<FileTier>,
    op_log: OpLog,
    current_size: AtomicU64,
    evictions: AtomicU64,
    transform: Option<Box<dyn ValueTransform>>,
    _value: PhantomData<fn() -> T>,
}

impl<T> CacheEngine<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(config: CacheConfig) -> BinderyResult<Self> {
        Self::with_transform(config, None)
    }

    pub fn with_transform(
        config: CacheConfig,
        transform: Option<Box<dyn ValueTransform>>,
    ) -> BinderyResult<Self> {
        let file = match config.tier {
            StorageTier::Memory => None,
            StorageTier::File | StorageTier::Hybrid => Some(FileTier::new(
                &config.base_dir,
                Duration::from_millis(config.file_op_timeout_ms),
                Duration::from_millis(config.file_retry_backoff_ms),
            )?),
        };
        Ok(Self {
            config,
            index: DashMap::new(),
            file,
            op_log: OpLog::new(),
            current_size: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            transform,
            _value: PhantomData,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn keeps_payload_in_memory(&self) -> bool {
        matches!(self.config.tier, StorageTier::Memory | StorageTier::Hybrid)
    }

    fn transform_ref(&self) -> Option<&dyn ValueTransform> {
        self.transform.as_deref()
    }

    /// Store a value. `ttl_secs` falls back to the configured default.
    pub fn set(
        &self,
        key: &str,
        value: &T,
        ttl_secs: Option<u64>,
        tags: Vec<String>,
        dependencies: Vec<String>,
    ) -> BinderyResult<()> {
        let start = Instant::now();
        let encoded = codec::encode(
            value,
            self.config.compression_threshold_bytes,
            self.transform_ref(),
        )?;
        let now = Utc::now();
        let metadata = EntryMetadata {
            created_at: now,
            updated_at: now,
            last_accessed: now,
            access_count: 0,
            ttl_secs: ttl_secs.unwrap_or(self.config.default_ttl_secs),
            size_bytes: encoded.bytes.len() as u64,
            compressed: encoded.compressed,
            content_hash: encoded.content_hash,
        };

        // Overwrite semantics: retire the old entry's size first.
        if let Some((_, old)) = self.index.remove(key) {
            self.current_size
                .fetch_sub(old.metadata.size_bytes, Ordering::Relaxed);
        }

        let mut file_ok = true;
        if let Some(file) = &self.file {
            let envelope = StoredEnvelope {
                key: key.to_string(),
                metadata: metadata.clone(),
                tags: tags.clone(),
                dependencies: dependencies.clone(),
                payload_b64: StoredEnvelope::encode_payload(&encoded.bytes),
            };
            if let Err(e) = file.write(&envelope) {
                warn!(key, error = %e, "file tier write failed, entry stays memory-only");
                file_ok = false;
            }
        }

        // In file-only mode a failed write means the value was never stored.
        if self.config.tier == StorageTier::File && !file_ok {
            self.op_log.record(OpKind::Set, false, start.elapsed());
            return Ok(());
        }

        let payload = if self.keeps_payload_in_memory() {
            encoded.bytes
        } else {
            Vec::new()
        };
        let size = metadata.size_bytes;
        self.index.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value: payload,
                metadata,
                tags,
                dependencies,
            },
        );
        self.current_size.fetch_add(size, Ordering::Relaxed);
        self.op_log.record(OpKind::Set, false, start.elapsed());

        self.evict_if_needed();
        Ok(())
    }

    /// Fetch a value. Expired entries are treated as misses and lazily
    /// purged; file-tier failures degrade to misses.
    pub fn get(&self, key: &str) -> Option<T> {
        let start = Instant::now();
        let result = self.get_inner(key);
        self.op_log
            .record(OpKind::Get, result.is_some(), start.elapsed());
        result
    }

    fn get_inner(&self, key: &str) -> Option<T> {
        let now = Utc::now();

        if let Some(mut entry) = self.index.get_mut(key) {
            if entry.is_valid(now) {
                entry.touch(now);
                let compressed = entry.metadata.compressed;
                let in_memory = if entry.value.is_empty() {
                    None
                } else {
                    Some(entry.value.clone())
                };
                drop(entry);
                let payload = match in_memory {
                    Some(p) => p,
                    None => self.read_file_payload(key)?,
                };
                return match codec::decode(&payload, compressed, self.transform_ref()) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!(key, error = %e, "cache decode failed, treating as miss");
                        None
                    }
                };
            }
            drop(entry);
            self.remove_entry(key);
            return None;
        }

        // Index miss: the file tier may still hold the entry (e.g. a prior
        // process populated the directory).
        let file = self.file.as_ref()?;
        let envelope = match file.read(key) {
            Ok(Some(env)) => env,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "file tier read failed, treating as miss");
                return None;
            }
        };

        let entry = CacheEntry {
            key: key.to_string(),
            value: Vec::new(),
            metadata: envelope.metadata.clone(),
            tags: envelope.tags.clone(),
            dependencies: envelope.dependencies.clone(),
        };
        if !entry.is_valid(now) {
            let _ = file.delete(key);
            return None;
        }

        let payload = match envelope.payload() {
            Ok(p) => p,
            Err(e) => {
                warn!(key, error = %e, "file tier payload corrupt, treating as miss");
                return None;
            }
        };
        let compressed = entry.metadata.compressed;

        // Promote into the index; hybrid also promotes the payload.
        let mut promoted = entry;
        promoted.touch(now);
        if self.keeps_payload_in_memory() {
            promoted.value = payload.clone();
        }
        self.current_size
            .fetch_add(promoted.metadata.size_bytes, Ordering::Relaxed);
        self.index.insert(key.to_string(), promoted);
        debug!(key, "file tier hit promoted into index");
        self.evict_if_needed();

        match codec::decode(&payload, compressed, self.transform_ref()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "cache decode failed, treating as miss");
                None
            }
        }
    }

    fn read_file_payload(&self, key: &str) -> Option<Vec<u8>> {
        let file = self.file.as_ref()?;
        match file.read(key) {
            Ok(Some(env)) => env.payload().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "file tier read failed, treating as miss");
                None
            }
        }
    }

    /// Whether a currently valid entry exists. Does not count as a hit.
    pub fn exists(&self, key: &str) -> bool {
        let now = Utc::now();
        if let Some(entry) = self.index.get(key) {
            return entry.is_valid(now);
        }
        if let Some(file) = &self.file {
            if let Ok(Some(env)) = file.read(key) {
                let ttl = chrono::Duration::seconds(env.metadata.ttl_secs as i64);
                return now < env.metadata.created_at + ttl;
            }
        }
        false
    }

    /// Remove one entry from every tier. Returns whether it was indexed.
    pub fn delete(&self, key: &str) -> bool {
        let start = Instant::now();
        let removed = self.remove_entry(key);
        self.op_log.record(OpKind::Delete, false, start.elapsed());
        removed
    }

    fn remove_entry(&self, key: &str) -> bool {
        let removed = if let Some((_, entry)) = self.index.remove(key) {
            self.current_size
                .fetch_sub(entry.metadata.size_bytes, Ordering::Relaxed);
            true
        } else {
            false
        };
        if let Some(file) = &self.file {
            if let Err(e) = file.delete(key) {
                warn!(key, error = %e, "file tier delete failed");
            }
        }
        removed
    }

    /// Remove every entry whose key matches the glob/regex pattern.
    pub fn invalidate(&self, pattern: &str) -> BinderyResult<InvalidationContext> {
        let start = Instant::now();
        let regex = invalidation::compile_pattern(pattern)?;

        let mut keys: Vec<String> = self
            .index
            .iter()
            .map(|e| e.key().clone())
            .filter(|k| regex.is_match(k))
            .collect();
        if let Some(file) = &self.file {
            for key in file.keys() {
                if regex.is_match(&key) && !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        for key in &keys {
            self.remove_entry(key);
        }
        self.op_log
            .record(OpKind::Invalidate, false, start.elapsed());
        info!(pattern, affected = keys.len(), "cache invalidation");

        Ok(InvalidationContext {
            trigger: pattern.to_string(),
            affected_keys: keys,
            reason: format!("keys matching `{pattern}` invalidated"),
            timestamp: Utc::now(),
        })
    }

    pub fn clear(&self) {
        self.index.clear();
        self.current_size.store(0, Ordering::Relaxed);
        if let Some(file) = &self.file {
            file.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.op_log.stats(
            self.index.len(),
            self.current_size.load(Ordering::Relaxed),
            self.config.max_size_bytes,
            self.evictions.load(Ordering::Relaxed),
        )
    }

    pub fn current_size_bytes(&self) -> u64 {
        self.current_size.load(Ordering::Relaxed)
    }

    /// Synchronous eviction after size-growing inserts (sets and file-tier
    /// promotions): when over capacity, reduce to 80% using the configured
    /// policy.
    fn evict_if_needed(&self) {
        let current = self.current_size.load(Ordering::Relaxed);
        if current <= self.config.max_size_bytes {
            return;
        }
        let target = (self.config.max_size_bytes as f64 * EVICTION_TARGET_RATIO) as u64;

        let candidates: Vec<Candidate> = self
            .index
            .iter()
            .map(|e| Candidate {
                key: e.key().clone(),
                size_bytes: e.metadata.size_bytes,
                last_accessed: e.metadata.last_accessed,
                access_count: e.metadata.access_count,
                expires_at: e.expires_at(),
            })
            .collect();

        let victims =
            eviction::select_victims(self.config.eviction_policy, candidates, current, target);
        for key in &victims {
            self.remove_entry(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
        info!(
            policy = ?self.config.eviction_policy,
            evicted = victims.len(),
            size = self.current_size.load(Ordering::Relaxed),
            target,
            "cache eviction"
        );
    }

    /// One expiry sweep pass, batched so the map is never locked for a full
    /// scan. Returns the number of purged entries.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut keys: Vec<String> = self.index.iter().map(|e| e.key().clone()).collect();
        if let Some(file) = &self.file {
            for key in file.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }

        let mut purged = 0;
        for batch in keys.chunks(self.config.sweep_batch.max(1)) {
            for key in batch {
                let expired = match self.index.get(key) {
                    Some(entry) => !entry.is_valid(now),
                    None => self
                        .file
                        .as_ref()
                        .and_then(|f| f.read(key).ok().flatten())
                        .map(|env| {
                            let ttl = chrono::Duration::seconds(env.metadata.ttl_secs as i64);
                            now >= env.metadata.created_at + ttl
                        })
                        .unwrap_or(false),
                };
                if expired {
                    self.remove_entry(key);
                    purged += 1;
                }
            }
            std::thread::yield_now();
        }
        if purged > 0 {
            debug!(purged, "expiry sweep");
        }
        purged
    }
}
