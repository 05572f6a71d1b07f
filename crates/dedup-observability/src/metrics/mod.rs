mod run_history;

pub use run_history::{log_summary, RunHistory, RunTotals};
