//! Content gathering across registered sources.
//!
//! A failing source degrades the pack instead of failing the assembly:
//! its items are skipped and an `integration` warning is attached.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use bindery_core::cancel::CancelFlag;
use bindery_core::errors::{AssemblyError, BinderyResult};
use bindery_core::models::{ContentItem, PackWarning, PrioritizationContext, WarningSeverity};
use bindery_core::traits::ContentSource;
use bindery_provenance::ProvenanceTracker;

/// Items gathered plus any per-source degradation warnings.
#[derive(Debug, Default)]
pub struct GatherOutcome {
    pub items: Vec<ContentItem>,
    pub warnings: Vec<PackWarning>,
}

/// Query every source, registering each successful one with the
/// provenance tracker. Source order is preserved in the item list.
pub fn gather_sources(
    sources: &[Arc<dyn ContentSource>],
    context: &PrioritizationContext,
    tracker: &ProvenanceTracker,
    session_id: &str,
    now: DateTime<Utc>,
    cancel: &CancelFlag,
) -> BinderyResult<GatherOutcome> {
    let mut outcome = GatherOutcome::default();

    for source in sources {
        if cancel.is_cancelled() {
            return Err(AssemblyError::Cancelled {
                stage: "sources-gathered".to_string(),
            }
            .into());
        }
        let items = match source.query(context) {
            Ok(items) => items,
            Err(err) => {
                warn!(source_id = source.source_id(), error = %err, "source query failed");
                outcome.warnings.push(PackWarning::new(
                    "integration",
                    WarningSeverity::Warning,
                    format!("source `{}` unavailable: {err}", source.source_id()),
                    "pack assembled without this source; retry once it recovers",
                ));
                continue;
            }
        };

        let age_days = mean_age_days(&items, now);
        tracker.register_source(
            session_id,
            source.source_type(),
            source.source_id(),
            source.validated(),
            source.authoritative(),
            age_days,
        )?;

        debug!(
            source_id = source.source_id(),
            items = items.len(),
            "source gathered"
        );
        outcome.items.extend(items);
    }

    Ok(outcome)
}

fn mean_age_days(items: &[ContentItem], now: DateTime<Utc>) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|item| item.age_days(now)).sum::<f64>() / items.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_fixtures::{fixed_now, make_item};

    #[test]
    fn mean_age_is_zero_for_no_items() {
        assert_eq!(mean_age_days(&[], fixed_now()), 0.0);
    }

    #[test]
    fn mean_age_averages_item_ages() {
        let now = fixed_now();
        let mut a = make_item("a", bindery_core::models::ContentType::Memory, "x");
        let mut b = make_item("b", bindery_core::models::ContentType::Memory, "y");
        a.timestamp = now - Duration::days(2);
        b.timestamp = now - Duration::days(4);
        let mean = mean_age_days(&[a, b], now);
        assert!((mean - 3.0).abs() < 1e-9);
    }
}
