/// Cache subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("file tier I/O failed for key {key}: {reason}")]
    FileIo { key: String, reason: String },

    #[error("file tier operation timed out after {elapsed_ms}ms")]
    FileTimeout { elapsed_ms: u64 },

    #[error("invalid invalidation pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("value codec failed: {reason}")]
    Codec { reason: String },
}
