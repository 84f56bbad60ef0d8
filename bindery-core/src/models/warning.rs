use serde::{Deserialize, Serialize};

/// Warning severity, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}

/// A structured warning attached to an assembly response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackWarning {
    /// e.g. "budget_exceeded", "integration", "performance", "integrity".
    pub warning_type: String,
    pub severity: WarningSeverity,
    pub message: String,
    pub recommendation: String,
}

impl PackWarning {
    pub fn new(
        warning_type: impl Into<String>,
        severity: WarningSeverity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            warning_type: warning_type.into(),
            severity,
            message: message.into(),
            recommendation: recommendation.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == WarningSeverity::Error
    }
}
