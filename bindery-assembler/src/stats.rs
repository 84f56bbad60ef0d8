//! Lock-free assembler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Subsystem a recorded operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Generation,
    Content,
    Cache,
    Integration,
}

#[derive(Debug, Default)]
struct Counters {
    operations: AtomicU64,
    failures: AtomicU64,
    duration_ms: AtomicU64,
}

impl Counters {
    fn record(&self, duration_ms: u64, failed: bool) {
        self.operations.fetch_add(1, Ordering::Relaxed);
        self.duration_ms.fetch_add(duration_ms, Ordering::Relaxed);
        if failed {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> ComponentStats {
        let operations = self.operations.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let total_duration_ms = self.duration_ms.load(Ordering::Relaxed);
        ComponentStats {
            operations,
            failures,
            total_duration_ms,
            avg_duration_ms: if operations == 0 {
                0.0
            } else {
                total_duration_ms as f64 / operations as f64
            },
        }
    }
}

/// Point-in-time counters for one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStats {
    pub operations: u64,
    pub failures: u64,
    pub total_duration_ms: u64,
    pub avg_duration_ms: f64,
}

/// Snapshot across all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssemblerStats {
    pub generation: ComponentStats,
    pub content: ComponentStats,
    pub cache: ComponentStats,
    pub integration: ComponentStats,
    pub overall: ComponentStats,
}

#[derive(Debug, Default)]
pub struct StatsCollector {
    generation: Counters,
    content: Counters,
    cache: Counters,
    integration: Counters,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, component: Component, duration_ms: u64, failed: bool) {
        let counters = match component {
            Component::Generation => &self.generation,
            Component::Content => &self.content,
            Component::Cache => &self.cache,
            Component::Integration => &self.integration,
        };
        counters.record(duration_ms, failed);
    }

    pub fn snapshot(&self) -> AssemblerStats {
        let generation = self.generation.snapshot();
        let content = self.content.snapshot();
        let cache = self.cache.snapshot();
        let integration = self.integration.snapshot();

        let operations = generation.operations
            + content.operations
            + cache.operations
            + integration.operations;
        let failures =
            generation.failures + content.failures + cache.failures + integration.failures;
        let total_duration_ms = generation.total_duration_ms
            + content.total_duration_ms
            + cache.total_duration_ms
            + integration.total_duration_ms;

        AssemblerStats {
            overall: ComponentStats {
                operations,
                failures,
                total_duration_ms,
                avg_duration_ms: if operations == 0 {
                    0.0
                } else {
                    total_duration_ms as f64 / operations as f64
                },
            },
            generation,
            content,
            cache,
            integration,
        }
    }
}
