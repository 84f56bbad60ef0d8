//! Data model shared across the workspace.

pub mod cache_entry;
pub mod content_item;
pub mod context_pack;
pub mod prioritization;
pub mod provenance;
pub mod strategy;
pub mod warning;

pub use cache_entry::{CacheEntry, CacheStats, EntryMetadata, InvalidationContext};
pub use content_item::{
    ContentItem, ContentType, ItemFeatures, ItemMetadata, ItemMetrics, MetaValue, SourceLocator,
};
pub use context_pack::{
    ContextPack, OptimizationImpact, OptimizationKind, OptimizationRecord, PackMetadata,
    PackSections, TokenUsage,
};
pub use prioritization::{
    AlternativeRanking, PrioritizationContext, PrioritizationResult, PrioritizedItem,
    ScoringFactors,
};
pub use provenance::{
    DecisionImpact, DecisionRecord, IntegrityReport, OperationRef, ProvenanceInfo, SessionStatus,
    SourceRegistration, SourceType, TrackingSession, TransformationKind, TransformationRecord,
};
pub use warning::{PackWarning, WarningSeverity};
