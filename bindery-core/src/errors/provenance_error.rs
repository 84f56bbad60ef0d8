/// Provenance subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum ProvenanceError {
    #[error("session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("session {session_id} is not active")]
    SessionNotActive { session_id: String },

    #[error("integrity violation: {issue_count} dangling references")]
    IntegrityViolation { issue_count: usize },
}
