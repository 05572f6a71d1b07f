//! # dedup-consolidation
//!
//! 3-phase duplicate consolidation pipeline: selection (with a reconciliation
//! sweep) → oracle-driven clustering → ranking and demotion.
//! `DedupEngine` is the orchestrator a scheduler calls.

pub mod algorithms;
pub mod cancel;
pub mod engine;
pub mod oracle;
pub mod pipeline;
pub mod runtime;

pub use algorithms::quality_rank;
pub use cancel::CancelHandle;
pub use engine::{DedupEngine, RunContext};
pub use oracle::{OracleBudget, OracleClient};
pub use pipeline::phase3_consolidation::ClusterOutcome;
pub use runtime::{DedupRuntime, RuntimeOptions};
