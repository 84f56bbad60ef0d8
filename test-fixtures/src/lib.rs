//! Shared builders for integration tests across crates.

use chrono::{DateTime, Duration, TimeZone, Utc};

use bindery_core::models::content_item::{
    ContentItem, ContentType, ItemFeatures, ItemMetadata, ItemMetrics, SourceLocator,
};
use bindery_core::models::prioritization::PrioritizationContext;

/// Fixed reference clock so rankings are reproducible across runs.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// A content item with sensible defaults; override fields as needed.
pub fn make_item(id: &str, content_type: ContentType, content: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        content_type,
        content: content.to_string(),
        source: SourceLocator {
            source_id: format!("src-{id}"),
            adapter: "fixture".to_string(),
            locator: format!("fixture://{id}"),
        },
        timestamp: fixed_now() - Duration::days(1),
        metadata: ItemMetadata::default(),
        metrics: ItemMetrics {
            usage_count: 5,
            success_rate: 0.8,
            effectiveness: 0.6,
            rating: 3.5,
            last_used: Some(fixed_now() - Duration::hours(6)),
            context_relevance: 0.5,
        },
        features: ItemFeatures {
            word_count: content.split_whitespace().count(),
            ..ItemFeatures::default()
        },
    }
}

/// An item whose content is exactly `size` ASCII characters.
pub fn make_sized_item(id: &str, size: usize) -> ContentItem {
    make_item(id, ContentType::Knowledge, &"x".repeat(size))
}

/// A context describing a typical bugfix task.
pub fn make_context() -> PrioritizationContext {
    PrioritizationContext {
        issue_id: "ISSUE-42".to_string(),
        agent_type: "bugfix".to_string(),
        description: "Fix the retry loop in the payment gateway client".to_string(),
        project: "gateway".to_string(),
        history: vec!["Previous attempt timed out".to_string()],
        goals: vec![
            "resolve flaky payment retries".to_string(),
            "keep gateway latency stable".to_string(),
        ],
        constraints: vec!["no schema changes".to_string()],
        preferences: vec!["prefer small diffs".to_string()],
    }
}
