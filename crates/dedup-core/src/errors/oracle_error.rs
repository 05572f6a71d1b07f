/// Errors raised while asking the similarity oracle for candidates.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("similarity oracle unavailable for {record_id}: {reason}")]
    Unavailable { record_id: String, reason: String },

    #[error("invalid similarity score {score} for candidate {candidate_id}")]
    InvalidScore { candidate_id: String, score: f64 },

    #[error("oracle budget exhausted after {calls} calls")]
    BudgetExhausted { calls: usize },
}
