//! Context pack assembler.
//!
//! Drives the staged pipeline over the prioritizer, budget manager, cache
//! engine, and provenance tracker. Failures never escape as errors: the
//! pipeline either returns a full pack or a degraded pack whose summary
//! carries an `[assembly-error]` marker and whose warnings include at
//! least one error-severity entry.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use bindery_cache::sweeper::{self, SweeperHandle};
use bindery_cache::{pack_key, CacheEngine};
use bindery_core::cancel::CancelFlag;
use bindery_core::config::BinderyConfig;
use bindery_core::errors::{AssemblyError, BinderyError, BinderyResult};
use bindery_core::models::{
    ContentItem, ContentType, ContextPack, OptimizationKind, PackMetadata, PackSections,
    PackWarning, PrioritizationResult, PrioritizedItem, ProvenanceInfo, SessionStatus, TokenUsage,
    TransformationKind, WarningSeverity,
};
use bindery_core::traits::ContentSource;
use bindery_priority::{FeedbackRecord, Prioritizer};
use bindery_provenance::ProvenanceTracker;

use crate::budget::{BudgetManager, SizeCounter};
use crate::request::{AssemblyRequest, AssemblyResponse, PackPerformance};
use crate::sources;
use crate::stages::AssemblyStage;
use crate::stats::{AssemblerStats, Component, StatsCollector};
use crate::transparency::{AssemblyRecord, ItemExplanation, TransparencyLog, TransparencyReport};

pub struct ContextPackAssembler {
    config: BinderyConfig,
    prioritizer: Prioritizer,
    budget: BudgetManager,
    cache: Arc<CacheEngine<ContextPack>>,
    tracker: Arc<ProvenanceTracker>,
    sources: RwLock<Vec<Arc<dyn ContentSource>>>,
    transparency: TransparencyLog,
    stats: StatsCollector,
}

/// Pipeline output before response shaping.
struct PipelineOutcome {
    pack: ContextPack,
    stage_reached: AssemblyStage,
    cache_used: bool,
    items_gathered: usize,
    warnings: Vec<PackWarning>,
}

impl ContextPackAssembler {
    pub fn new(config: BinderyConfig) -> BinderyResult<Self> {
        let counter = SizeCounter::new(config.assembly.counting_method);
        Ok(Self {
            prioritizer: Prioritizer::new(config.priority.clone()),
            budget: BudgetManager::new(counter),
            cache: Arc::new(CacheEngine::new(config.cache.clone())?),
            tracker: Arc::new(ProvenanceTracker::new(config.provenance.clone())),
            sources: RwLock::new(Vec::new()),
            transparency: TransparencyLog::new(),
            stats: StatsCollector::new(),
            config,
        })
    }

    pub fn register_source(&self, source: Arc<dyn ContentSource>) {
        match self.sources.write() {
            Ok(mut sources) => sources.push(source),
            Err(poisoned) => poisoned.into_inner().push(source),
        }
    }

    pub fn tracker(&self) -> &ProvenanceTracker {
        self.tracker.as_ref()
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats.snapshot()
    }

    /// Spawn the background cache expiry sweeper. The handle stops the
    /// sweeper thread when dropped.
    pub fn start_cache_sweeper(&self) -> SweeperHandle {
        sweeper::spawn(Arc::clone(&self.cache))
    }

    /// Invalidate cached packs matching `pattern` (glob, or `re:` raw).
    pub fn invalidate_cache(&self, pattern: &str) -> BinderyResult<usize> {
        Ok(self.cache.invalidate(pattern)?.affected_keys.len())
    }

    /// Feed a pack rating back into every prioritization strategy.
    pub fn record_feedback(&self, feedback: &FeedbackRecord) {
        self.prioritizer.learn_from_feedback(feedback);
    }

    /// Explain a recent assembly by pack id, issue id, or agent type.
    pub fn process_why_command(&self, query: &str) -> Option<TransparencyReport> {
        self.transparency.process_why_command(query)
    }

    pub fn assemble_context_pack(&self, request: &AssemblyRequest) -> AssemblyResponse {
        self.assemble_with_cancel(request, &CancelFlag::new())
    }

    /// Cancel-aware assembly. Never returns an error: any pipeline
    /// failure yields a degraded pack instead.
    pub fn assemble_with_cancel(
        &self,
        request: &AssemblyRequest,
        cancel: &CancelFlag,
    ) -> AssemblyResponse {
        let start = Instant::now();
        let pack_id = uuid::Uuid::new_v4().to_string();
        let session_id = self.tracker.start_session(&pack_id);

        let outcome = match self.run_pipeline(request, &pack_id, &session_id, start, cancel) {
            Ok(outcome) => {
                let _ = self.tracker.end_session(&session_id, SessionStatus::Completed);
                outcome
            }
            Err(err) => {
                let _ = self.tracker.end_session(&session_id, SessionStatus::Error);
                self.degraded_outcome(request, &pack_id, &session_id, err)
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let mut warnings = outcome.warnings;
        if duration_ms > self.config.assembly.performance_ceiling_ms {
            warnings.push(PackWarning::new(
                "performance",
                WarningSeverity::Warning,
                format!(
                    "assembly took {duration_ms}ms, over the {}ms ceiling",
                    self.config.assembly.performance_ceiling_ms
                ),
                "reduce source volume or raise the ceiling",
            ));
        }

        let report = self.tracker.verify_integrity();
        if !report.valid {
            warnings.push(PackWarning::new(
                "integrity",
                WarningSeverity::Warning,
                format!("provenance integrity issues: {}", report.issues.join("; ")),
                "inspect the provenance audit log",
            ));
        }

        for warning in &warnings {
            if warning.warning_type == "integration" {
                self.stats.record(Component::Integration, 0, true);
            }
        }
        let degraded = outcome.stage_reached == AssemblyStage::Error;
        self.stats.record(Component::Generation, duration_ms, degraded);

        let pack = outcome.pack;
        self.transparency.record(AssemblyRecord {
            pack_id: pack.metadata.pack_id.clone(),
            issue_id: pack.metadata.issue_id.clone(),
            agent_type: pack.metadata.agent_type.clone(),
            created_at: pack.metadata.created_at,
            strategy: request
                .strategy
                .clone()
                .unwrap_or_else(|| self.config.priority.default_strategy.clone()),
            cache_used: outcome.cache_used,
            duration_ms,
            items: pack
                .sections
                .iter_items()
                .map(|item| ItemExplanation {
                    item_id: item.item.id.clone(),
                    rank: item.rank,
                    score: item.score,
                    reasoning: item.reasoning.clone(),
                })
                .collect(),
            optimizations: pack.token_usage.optimizations.clone(),
            warnings: warnings.clone(),
        });

        info!(
            pack_id = %pack.metadata.pack_id,
            issue_id = %pack.metadata.issue_id,
            stage = %outcome.stage_reached,
            duration_ms,
            items = pack.sections.item_count(),
            cache_used = outcome.cache_used,
            "assembly finished"
        );

        AssemblyResponse {
            performance: PackPerformance {
                duration_ms,
                stage_reached: outcome.stage_reached,
                items_gathered: outcome.items_gathered,
                items_included: pack.sections.item_count(),
            },
            cache_used: outcome.cache_used,
            context_pack: pack,
            warnings,
        }
    }

    fn run_pipeline(
        &self,
        request: &AssemblyRequest,
        pack_id: &str,
        session_id: &str,
        start: Instant,
        cancel: &CancelFlag,
    ) -> Result<PipelineOutcome, BinderyError> {
        let now = Utc::now();
        let context = request.to_context();
        let mut warnings = Vec::new();

        // received → sources-gathered
        self.check_deadline(start, AssemblyStage::Received)?;
        self.check_cancel(cancel, AssemblyStage::Received)?;
        let registered = match self.sources.read() {
            Ok(sources) => sources.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        let gather_start = Instant::now();
        let gathered =
            sources::gather_sources(&registered, &context, &self.tracker, session_id, now, cancel)?;
        self.stats.record(
            Component::Content,
            gather_start.elapsed().as_millis() as u64,
            !gathered.warnings.is_empty(),
        );
        warnings.extend(gathered.warnings);
        let items_gathered = gathered.items.len();
        let input_hash = gathered_content_hash(&gathered.items);

        // sources-gathered → prioritized
        self.check_deadline(start, AssemblyStage::SourcesGathered)?;
        let result = self.prioritizer.prioritize_at(
            &gathered.items,
            &context,
            request.strategy.as_deref(),
            now,
            cancel,
        )?;
        self.record_prioritization(session_id, &gathered.items, &result)?;

        // prioritized → budget-enforced
        self.check_deadline(start, AssemblyStage::Prioritized)?;
        let limit = request
            .budget_limit
            .unwrap_or(self.config.assembly.default_budget_limit);
        let outcome = self.budget.enforce_budget(result.items, limit, cancel)?;
        self.record_optimizations(session_id, &outcome.usage)?;
        warnings.extend(outcome.warnings);

        // budget-enforced → cache-checked
        self.check_deadline(start, AssemblyStage::BudgetEnforced)?;
        let key = pack_key(
            &request.issue_id,
            &request.agent_type,
            &input_hash,
            &self.config.assembly.pack_version,
        );
        if !request.force_refresh {
            let cache_start = Instant::now();
            let hit = self.cache.get(&key);
            self.stats.record(
                Component::Cache,
                cache_start.elapsed().as_millis() as u64,
                false,
            );
            if let Some(pack) = hit {
                self.tracker.record_decision(
                    session_id,
                    "served pack from cache",
                    "input content hash matched a cached pack",
                    1.0,
                )?;
                return Ok(PipelineOutcome {
                    pack,
                    stage_reached: AssemblyStage::Returned,
                    cache_used: true,
                    items_gathered,
                    warnings,
                });
            }
        }

        // cache-checked → assembled
        self.check_deadline(start, AssemblyStage::CacheChecked)?;
        self.check_cancel(cancel, AssemblyStage::CacheChecked)?;
        let sections = build_sections(&request.issue_id, outcome.included);
        self.tracker.record_decision(
            session_id,
            &format!(
                "included {} of {} gathered items",
                sections.item_count(),
                items_gathered
            ),
            "rank order under the active strategy, within budget",
            result.confidence / 100.0,
        )?;
        let provenance = self.tracker.generate_provenance_info(session_id)?;
        let pack = ContextPack {
            metadata: PackMetadata {
                pack_id: pack_id.to_string(),
                issue_id: request.issue_id.clone(),
                agent_type: request.agent_type.clone(),
                version: self.config.assembly.pack_version.clone(),
                created_at: now,
                input_content_hash: input_hash,
            },
            sections,
            provenance,
            token_usage: outcome.usage,
        };

        // assembled → cached. A write failure degrades to an uncached pack.
        self.check_deadline(start, AssemblyStage::Assembled)?;
        let cache_start = Instant::now();
        let stored = self.cache.set(
            &key,
            &pack,
            None,
            vec![request.issue_id.clone(), request.agent_type.clone()],
            Vec::new(),
        );
        self.stats.record(
            Component::Cache,
            cache_start.elapsed().as_millis() as u64,
            stored.is_err(),
        );
        if let Err(err) = stored {
            warn!(key = %key, error = %err, "pack cache write failed");
            warnings.push(PackWarning::new(
                "cache",
                WarningSeverity::Warning,
                format!("pack could not be cached: {err}"),
                "subsequent identical requests will re-assemble",
            ));
        }

        // cached → returned
        self.check_deadline(start, AssemblyStage::Cached)?;
        Ok(PipelineOutcome {
            pack,
            stage_reached: AssemblyStage::Returned,
            cache_used: false,
            items_gathered,
            warnings,
        })
    }

    fn record_prioritization(
        &self,
        session_id: &str,
        input: &[ContentItem],
        result: &PrioritizationResult,
    ) -> BinderyResult<()> {
        self.tracker.record_transformation(
            session_id,
            TransformationKind::Prioritize,
            &format!("ranked {} items under `{}`", result.items.len(), result.strategy),
            input.iter().map(|item| item.id.clone()).collect(),
            result.items.iter().map(|item| item.item.id.clone()).collect(),
            result.confidence / 100.0,
        )?;
        Ok(())
    }

    /// One transformation record per optimization kind actually applied.
    fn record_optimizations(&self, session_id: &str, usage: &TokenUsage) -> BinderyResult<()> {
        for kind in [
            OptimizationKind::Truncate,
            OptimizationKind::SubstituteSummary,
            OptimizationKind::Compress,
            OptimizationKind::Eliminate,
        ] {
            let applied: Vec<&str> = usage
                .optimizations
                .iter()
                .filter(|opt| opt.kind == kind)
                .map(|opt| opt.description.as_str())
                .collect();
            if applied.is_empty() {
                continue;
            }
            self.tracker.record_transformation(
                session_id,
                transformation_for(kind),
                &format!("{} applied to {} items", transformation_name(kind), applied.len()),
                Vec::new(),
                Vec::new(),
                1.0,
            )?;
        }
        Ok(())
    }

    fn degraded_outcome(
        &self,
        request: &AssemblyRequest,
        pack_id: &str,
        session_id: &str,
        err: BinderyError,
    ) -> PipelineOutcome {
        warn!(pack_id, error = %err, "assembly degraded");
        let provenance = self
            .tracker
            .generate_provenance_info(session_id)
            .unwrap_or_else(|_| ProvenanceInfo {
                session_id: session_id.to_string(),
                source_count: 0,
                transformation_count: 0,
                decision_count: 0,
                trust_score: 0,
                sources: Vec::new(),
            });

        let sections = PackSections {
            summary: format!("[assembly-error] {err}"),
            ..PackSections::default()
        };

        PipelineOutcome {
            pack: ContextPack {
                metadata: PackMetadata {
                    pack_id: pack_id.to_string(),
                    issue_id: request.issue_id.clone(),
                    agent_type: request.agent_type.clone(),
                    version: self.config.assembly.pack_version.clone(),
                    created_at: Utc::now(),
                    input_content_hash: String::new(),
                },
                sections,
                provenance,
                token_usage: TokenUsage::default(),
            },
            stage_reached: AssemblyStage::Error,
            cache_used: false,
            items_gathered: 0,
            warnings: vec![PackWarning::new(
                warning_type_for(&err),
                WarningSeverity::Error,
                format!("assembly failed: {err}"),
                "pack is degraded; retry or inspect the failing stage",
            )],
        }
    }

    fn check_deadline(&self, start: Instant, stage: AssemblyStage) -> Result<(), AssemblyError> {
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if elapsed_ms > self.config.assembly.assembly_timeout_ms {
            return Err(AssemblyError::Timeout {
                stage: stage.to_string(),
                elapsed_ms,
            });
        }
        Ok(())
    }

    fn check_cancel(&self, cancel: &CancelFlag, stage: AssemblyStage) -> Result<(), AssemblyError> {
        if cancel.is_cancelled() {
            return Err(AssemblyError::Cancelled {
                stage: stage.to_string(),
            });
        }
        Ok(())
    }
}

/// blake3 hex over the per-item content hashes, in retrieval order.
fn gathered_content_hash(items: &[ContentItem]) -> String {
    let mut hasher = blake3::Hasher::new();
    for item in items {
        hasher.update(item.content_hash().as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Group included items into typed sections, keeping rank order within
/// each section, and link cross references where one item's content
/// mentions another item's id.
fn build_sections(issue_id: &str, included: Vec<PrioritizedItem>) -> PackSections {
    let ids: Vec<String> = included.iter().map(|item| item.item.id.clone()).collect();
    let mut cross_references = Vec::new();
    for item in &included {
        for id in &ids {
            if *id != item.item.id && item.item.content.contains(id.as_str()) {
                cross_references.push((item.item.id.clone(), id.clone()));
            }
        }
    }

    let mut sections = PackSections {
        cross_references,
        ..PackSections::default()
    };
    let total = included.len();
    for item in included {
        match item.item.content_type {
            ContentType::Memory => sections.memory.push(item),
            ContentType::Knowledge => sections.knowledge.push(item),
            ContentType::Realtime => sections.realtime.push(item),
            ContentType::AgentSpecific => sections.agent_specific.push(item),
        }
    }
    sections.summary = format!(
        "{total} items assembled for {issue_id}: {} memory, {} knowledge, {} realtime, {} agent-specific",
        sections.memory.len(),
        sections.knowledge.len(),
        sections.realtime.len(),
        sections.agent_specific.len(),
    );
    sections
}

fn transformation_for(kind: OptimizationKind) -> TransformationKind {
    match kind {
        OptimizationKind::Truncate => TransformationKind::Truncate,
        OptimizationKind::SubstituteSummary => TransformationKind::Summarize,
        OptimizationKind::Compress => TransformationKind::Compress,
        OptimizationKind::Eliminate => TransformationKind::Eliminate,
    }
}

fn transformation_name(kind: OptimizationKind) -> &'static str {
    match kind {
        OptimizationKind::Truncate => "truncation",
        OptimizationKind::SubstituteSummary => "summary substitution",
        OptimizationKind::Compress => "whitespace compression",
        OptimizationKind::Eliminate => "elimination",
    }
}

fn warning_type_for(err: &BinderyError) -> &'static str {
    match err {
        BinderyError::Assembly(AssemblyError::BudgetExceeded { .. }) => "budget_exceeded",
        BinderyError::Assembly(AssemblyError::Timeout { .. }) => "timeout",
        BinderyError::Assembly(AssemblyError::Cancelled { .. }) => "cancelled",
        BinderyError::Assembly(AssemblyError::SourceUnavailable { .. }) => "integration",
        _ => "assembly_failure",
    }
}
