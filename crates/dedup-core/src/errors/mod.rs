mod consolidation_error;
mod dedup_error;
mod oracle_error;
mod storage_error;

pub use consolidation_error::ConsolidationError;
pub use dedup_error::{DedupError, DedupResult};
pub use oracle_error::OracleError;
pub use storage_error::StorageError;
