/// Assembly subsystem errors.
///
/// None of these escape the assembler's public API: every variant is
/// converted into a degraded-but-valid pack with warnings.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("source `{source_id}` unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("budget exceeded: needed {needed} units, limit {limit}")]
    BudgetExceeded { needed: usize, limit: usize },

    #[error("assembly cancelled at stage {stage}")]
    Cancelled { stage: String },

    #[error("assembly timed out after {elapsed_ms}ms at stage {stage}")]
    Timeout { stage: String, elapsed_ms: u64 },

    #[error("assembly failed: {reason}")]
    Failed { reason: String },
}
