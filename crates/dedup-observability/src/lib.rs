//! # dedup-observability
//!
//! Tracing subscriber setup, span macros for each pipeline stage, and an
//! in-process history of run summaries.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{log_summary, RunHistory, RunTotals};
pub use tracing_setup::init_tracing;
