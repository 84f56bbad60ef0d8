use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants;

/// Provenance tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Completed sessions older than this are garbage-collected.
    pub session_max_age_secs: u64,
    /// Audit log hard cap.
    pub audit_log_cap: usize,
    /// Entries kept after a trim.
    pub audit_log_trim_to: usize,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            session_max_age_secs: defaults::DEFAULT_SESSION_MAX_AGE_SECS,
            audit_log_cap: constants::AUDIT_LOG_CAP,
            audit_log_trim_to: constants::AUDIT_LOG_TRIM_TO,
        }
    }
}
