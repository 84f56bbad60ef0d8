//! Error types for every Bindery subsystem, plus the umbrella [`BinderyError`].

mod assembly_error;
mod cache_error;
mod priority_error;
mod provenance_error;

pub use assembly_error::AssemblyError;
pub use cache_error::CacheError;
pub use priority_error::PriorityError;
pub use provenance_error::ProvenanceError;

/// Convenience alias used across the workspace.
pub type BinderyResult<T> = Result<T, BinderyError>;

/// Umbrella error for the whole system.
#[derive(Debug, thiserror::Error)]
pub enum BinderyError {
    #[error(transparent)]
    Priority(#[from] PriorityError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Provenance(#[from] ProvenanceError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
