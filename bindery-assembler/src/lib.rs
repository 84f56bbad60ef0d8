//! # bindery-assembler
//!
//! Orchestrates the full assembly pipeline: source gathering → provenance
//! registration → prioritization → budget enforcement → cache → pack.
//! The public API never surfaces an error: every failure produces a
//! degraded-but-structurally-valid pack with warnings.

pub mod budget;
pub mod engine;
pub mod request;
pub mod sources;
pub mod stages;
pub mod stats;
pub mod transparency;

pub use engine::ContextPackAssembler;
pub use request::{AssemblyRequest, AssemblyResponse, PackPerformance};
pub use stages::AssemblyStage;
pub use transparency::TransparencyReport;
