//! # bindery-core
//!
//! Foundation crate for the Bindery context-pack system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelFlag;
pub use config::BinderyConfig;
pub use errors::{BinderyError, BinderyResult};
pub use models::content_item::{ContentItem, ContentType};
pub use models::context_pack::ContextPack;
pub use models::prioritization::{PrioritizationContext, PrioritizedItem};
pub use models::warning::{PackWarning, WarningSeverity};
