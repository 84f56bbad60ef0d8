//! # bindery-priority
//!
//! Content prioritizer: derives per-item features against a target context,
//! scores them with a 7-factor weighted model, ranks with dense 1..=N ranks,
//! and nudges strategy weights from user feedback.

pub mod engine;
pub mod features;
pub mod learning;
pub mod scorer;
pub mod strategies;

pub use engine::Prioritizer;
pub use learning::FeedbackRecord;
pub use strategies::StrategyRegistry;
