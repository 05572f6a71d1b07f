mod archived_record;
mod cluster;
mod content_filter;
mod content_record;
mod run_summary;
mod similarity_link;

pub use archived_record::ArchivedRecord;
pub use cluster::Cluster;
pub use content_filter::ContentFilter;
pub use content_record::{ContentRecord, ContentStats, ContentStatus};
pub use run_summary::{IssueKind, RunIssue, RunSummary};
pub use similarity_link::SimilarityLink;
