//! # bindery-provenance
//!
//! Append-only provenance tracking for context-pack assembly: per-session
//! source registrations, transformations, and decisions, double-logged into
//! a bounded global audit log, with derived trust scores and referential
//! integrity verification.

pub mod audit;
pub mod reliability;
pub mod tracker;

pub use audit::{AuditEntry, AuditLog};
pub use tracker::{ProvenanceQuery, ProvenanceTracker, SessionExport};
