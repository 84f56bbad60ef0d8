//! # bindery-cache
//!
//! Cache engine for assembled context packs: content-addressed keys, tiered
//! memory/file storage, four interchangeable eviction policies, TTL validity
//! with a background sweep, pattern invalidation, and rolling-log statistics.

pub mod codec;
pub mod engine;
pub mod eviction;
pub mod file_tier;
pub mod invalidation;
pub mod key;
pub mod stats;
pub mod sweeper;

pub use engine::CacheEngine;
pub use key::pack_key;
