//! Rolling operation log (capped at 1000 entries) and derived statistics.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use bindery_core::constants::CACHE_OP_LOG_CAP;
use bindery_core::models::cache_entry::CacheStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Get,
    Set,
    Delete,
    Invalidate,
}

#[derive(Debug, Clone, Copy)]
pub struct OpRecord {
    pub kind: OpKind,
    /// Only meaningful for `Get`.
    pub hit: bool,
    pub latency: Duration,
}

/// Bounded operation log. Contention is append-only on the tail.
#[derive(Debug, Default)]
pub struct OpLog {
    ops: Mutex<VecDeque<OpRecord>>,
}

impl OpLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: OpKind, hit: bool, latency: Duration) {
        let mut ops = self.ops.lock().unwrap_or_else(|e| e.into_inner());
        if ops.len() >= CACHE_OP_LOG_CAP {
            ops.pop_front();
        }
        ops.push_back(OpRecord { kind, hit, latency });
    }

    /// Derive stats; size/capacity/eviction figures come from the engine.
    pub fn stats(
        &self,
        entry_count: usize,
        size_bytes: u64,
        max_size_bytes: u64,
        evictions: u64,
    ) -> CacheStats {
        let ops = self.ops.lock().unwrap_or_else(|e| e.into_inner());
        let gets: Vec<&OpRecord> = ops.iter().filter(|o| o.kind == OpKind::Get).collect();
        let hits = gets.iter().filter(|o| o.hit).count() as u64;
        let misses = gets.len() as u64 - hits;
        let hit_rate = if gets.is_empty() {
            0.0
        } else {
            hits as f64 / gets.len() as f64
        };
        let avg_retrieval_ms = if gets.is_empty() {
            0.0
        } else {
            gets.iter().map(|o| o.latency.as_secs_f64() * 1_000.0).sum::<f64>() / gets.len() as f64
        };
        let utilization = if max_size_bytes == 0 {
            0.0
        } else {
            size_bytes as f64 / max_size_bytes as f64
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            evictions,
            entry_count,
            size_bytes,
            utilization,
            avg_retrieval_ms,
        }
    }
}
