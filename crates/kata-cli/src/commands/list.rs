use anyhow::Context;
use kata_config::SyncConfig;
use kata_core::{ChallengeId, ChallengeRecord, CompletedAt};
use kata_store::RecordStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct StoredRecord {
    id: ChallengeId,
    name: String,
    completed_at: CompletedAt,
    languages: Vec<String>,
    solutions: usize,
}

impl From<&ChallengeRecord> for StoredRecord {
    fn from(record: &ChallengeRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            completed_at: record.completed_at.clone(),
            languages: record.completed_languages.clone(),
            solutions: record.solution_count(),
        }
    }
}

/// Handle `kata-sync list`.
pub fn handle(config: &SyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = RecordStore::in_dir(config.repo.require_local_path()?);
    let records = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    let rows: Vec<StoredRecord> = records.iter().map(StoredRecord::from).collect();
    output(&rows, flags.format)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use kata_core::Solution;

    use super::*;

    #[test]
    fn stored_record_counts_solutions() {
        let mut record = ChallengeRecord::new(
            "a",
            "A",
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            vec!["rust".into(), "go".into()],
        );
        record.attach_solutions(vec![Solution {
            language: "rust".into(),
            code: "fn main() {}".into(),
            description: String::new(),
        }]);

        let row = StoredRecord::from(&record);

        assert_eq!(row.solutions, 1);
        assert_eq!(row.languages, vec!["rust", "go"]);
    }
}
