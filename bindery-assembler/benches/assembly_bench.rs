//! Criterion benchmarks for the assembly pipeline.
//!
//! Targets:
//! - fresh assembly of 100 items well under the 1s performance ceiling
//! - cache-hit path < 1ms

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use bindery_assembler::{AssemblyRequest, ContextPackAssembler};
use bindery_core::config::{BinderyConfig, StorageTier};
use bindery_core::errors::BinderyResult;
use bindery_core::models::{ContentItem, ContentType, PrioritizationContext, SourceType};
use bindery_core::traits::ContentSource;
use test_fixtures::make_item;

struct FixedSource(Vec<ContentItem>);

impl ContentSource for FixedSource {
    fn source_id(&self) -> &str {
        "bench-source"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Knowledge
    }

    fn query(&self, _context: &PrioritizationContext) -> BinderyResult<Vec<ContentItem>> {
        Ok(self.0.clone())
    }
}

fn bench_assembler(items: usize) -> ContextPackAssembler {
    let mut config = BinderyConfig::default();
    config.cache.tier = StorageTier::Memory;
    let assembler = ContextPackAssembler::new(config).unwrap();
    let corpus = (0..items)
        .map(|i| {
            make_item(
                &format!("item-{i}"),
                ContentType::Knowledge,
                "payment gateway retry loop backoff latency fix",
            )
        })
        .collect();
    assembler.register_source(Arc::new(FixedSource(corpus)));
    assembler
}

fn request() -> AssemblyRequest {
    AssemblyRequest {
        issue_id: "BENCH-1".to_string(),
        agent_type: "bugfix".to_string(),
        description: "Fix the retry loop in the payment gateway client".to_string(),
        project: "gateway".to_string(),
        ..AssemblyRequest::default()
    }
}

fn bench_fresh_assembly(c: &mut Criterion) {
    let assembler = bench_assembler(100);
    let mut req = request();
    req.force_refresh = true;

    c.bench_function("assemble_100_items_fresh", |bench| {
        bench.iter(|| assembler.assemble_context_pack(&req));
    });
}

fn bench_cached_assembly(c: &mut Criterion) {
    let assembler = bench_assembler(100);
    let req = request();
    assembler.assemble_context_pack(&req);

    c.bench_function("assemble_100_items_cached", |bench| {
        bench.iter(|| assembler.assemble_context_pack(&req));
    });
}

criterion_group!(benches, bench_fresh_assembly, bench_cached_assembly);
criterion_main!(benches);
