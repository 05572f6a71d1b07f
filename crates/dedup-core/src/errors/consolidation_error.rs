/// Errors raised while demoting cluster members.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("archival write failed for {record_id}: {reason}")]
    ArchivalWriteFailed { record_id: String, reason: String },

    #[error("primary delete failed for {record_id} after archival: {reason}")]
    PrimaryDeleteFailed { record_id: String, reason: String },

    #[error("a consolidation run is already in progress")]
    AlreadyRunning,
}
