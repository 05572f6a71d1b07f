//! Canonical-record selection.
//!
//! Descending priority:
//! 1. status tier (published > pending > draft > anything else)
//! 2. engagement (views + likes)
//! 3. created_at (newer first)
//! 4. id ascending, so the order is total and independent of input order

use std::cmp::Ordering;

use dedup_core::models::ContentRecord;

/// Ordering where `Less` means `a` is the better candidate.
pub fn compare(a: &ContentRecord, b: &ContentRecord) -> Ordering {
    b.status
        .tier()
        .cmp(&a.status.tier())
        .then_with(|| b.engagement().cmp(&a.engagement()))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort best-first. Index 0 is the canonical record.
pub fn rank(mut records: Vec<ContentRecord>) -> Vec<ContentRecord> {
    records.sort_by(compare);
    records
}

/// Rank and split into the canonical record and the records to demote.
/// Returns `None` for an empty input.
pub fn split_canonical(records: Vec<ContentRecord>) -> Option<(ContentRecord, Vec<ContentRecord>)> {
    let mut ranked = rank(records).into_iter();
    let keep = ranked.next()?;
    Some((keep, ranked.collect()))
}
