//! Global audit log: every tracker mutation lands here in addition to its
//! entity map. Bounded: at the cap the oldest half is trimmed away.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    /// e.g. "register_source", "record_decision".
    pub action: String,
    pub details: String,
    /// "low" | "medium" | "high".
    pub impact: String,
}

/// Size-bounded audit log. Append-only tail contention only.
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    cap: usize,
    trim_to: usize,
}

impl AuditLog {
    pub fn new(cap: usize, trim_to: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            cap,
            trim_to: trim_to.min(cap),
        }
    }

    pub fn append(&self, entry: AuditEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
        if entries.len() > self.cap {
            let excess = entries.len() - self.trim_to;
            entries.drain(..excess);
            debug!(trimmed = excess, retained = self.trim_to, "audit log trimmed");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cloned snapshot, oldest first.
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            actor: "test".to_string(),
            action: "append".to_string(),
            details: format!("entry {n}"),
            impact: "low".to_string(),
        }
    }

    #[test]
    fn trims_to_half_at_cap() {
        let log = AuditLog::new(100, 50);
        for n in 0..101 {
            log.append(entry(n));
        }
        assert_eq!(log.len(), 50);
        // Newest entries survive the trim.
        let last = log.snapshot().pop().unwrap();
        assert_eq!(last.details, "entry 100");
    }
}
