//! # dedup-core
//!
//! Foundation crate for the duplicate consolidation pipeline.
//! Defines the content/archive models, store and oracle traits, errors,
//! config, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::DedupConfig;
pub use errors::{DedupError, DedupResult};
pub use models::{ArchivedRecord, Cluster, ContentRecord, ContentStats, ContentStatus, RunSummary};
