use crate::errors::BinderyResult;
use crate::models::content_item::ContentItem;
use crate::models::prioritization::PrioritizationContext;
use crate::models::provenance::SourceType;

/// A pluggable content source adapter (memory, knowledge, index/retrieval,
/// realtime stores).
///
/// Each source is independently failable: a query error degrades the pack
/// rather than aborting assembly. The core never retries source queries.
pub trait ContentSource: Send + Sync {
    /// Stable id for provenance registration.
    fn source_id(&self) -> &str;

    /// Source type, used for the reliability baseline.
    fn source_type(&self) -> SourceType;

    /// Query candidate items for the given context.
    fn query(&self, context: &PrioritizationContext) -> BinderyResult<Vec<ContentItem>>;

    /// Whether this source's content has been validated upstream.
    fn validated(&self) -> bool {
        false
    }

    /// Whether this source is authoritative for its domain.
    fn authoritative(&self) -> bool {
        false
    }
}
