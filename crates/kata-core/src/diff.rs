//! Id-based set difference between the remote catalog and the local store.

use std::collections::HashSet;

use crate::id::ChallengeId;
use crate::record::ChallengeRecord;

/// Records from `remote` whose id does not appear in `existing`.
///
/// Remote order is preserved. This is a set difference by id: every remote
/// record with an unknown id is returned, including repeated ids, so callers
/// that care about upstream duplicates should run [`dedupe_by_id`] first.
#[must_use]
pub fn new_records(
    remote: Vec<ChallengeRecord>,
    existing: &[ChallengeRecord],
) -> Vec<ChallengeRecord> {
    let known: HashSet<&ChallengeId> = existing.iter().map(|record| &record.id).collect();
    remote
        .into_iter()
        .filter(|record| !known.contains(&record.id))
        .collect()
}

/// Drop repeated ids, keeping the first occurrence of each.
///
/// Returns the surviving records (order preserved) and the ids of the
/// dropped duplicates.
#[must_use]
pub fn dedupe_by_id(records: Vec<ChallengeRecord>) -> (Vec<ChallengeRecord>, Vec<ChallengeId>) {
    let mut seen = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = Vec::new();

    for record in records {
        if seen.insert(record.id.clone()) {
            kept.push(record);
        } else {
            dropped.push(record.id);
        }
    }

    (kept, dropped)
}
