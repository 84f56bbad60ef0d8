/// Prioritization subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum PriorityError {
    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("scoring failed: {reason}")]
    ScoringFailed { reason: String },
}
