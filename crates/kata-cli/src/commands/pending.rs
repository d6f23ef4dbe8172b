use anyhow::Context;
use kata_catalog::{CatalogClient, ChallengeDirectory};
use kata_config::SyncConfig;
use kata_core::{ChallengeId, ChallengeRecord, CompletedAt, dedupe_by_id, new_records};
use kata_store::RecordStore;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct PendingRecord {
    id: ChallengeId,
    name: String,
    completed_at: CompletedAt,
    languages: Vec<String>,
}

impl From<ChallengeRecord> for PendingRecord {
    fn from(record: ChallengeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            completed_at: record.completed_at,
            languages: record.completed_languages,
        }
    }
}

/// Handle `kata-sync pending`: fetch and diff without a browser or writes.
pub async fn handle(config: &SyncConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    config.validate_for_catalog()?;
    let store = RecordStore::in_dir(config.repo.require_local_path()?);
    let catalog =
        CatalogClient::with_timeout(&config.api.base_url, config.api_user(), config.api.timeout())?
            .with_all_pages(config.api.all_pages);

    let remote = catalog
        .fetch_completed()
        .await
        .context("failed to fetch completed challenges")?;
    let existing = store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    let pending = pending_records(remote, &existing);
    output(&pending, flags.format)
}

fn pending_records(
    remote: Vec<ChallengeRecord>,
    existing: &[ChallengeRecord],
) -> Vec<PendingRecord> {
    let (remote, _) = dedupe_by_id(remote);
    new_records(remote, existing)
        .into_iter()
        .map(PendingRecord::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(id: &str) -> ChallengeRecord {
        ChallengeRecord::new(
            id,
            id.to_uppercase(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            vec!["rust".into()],
        )
    }

    #[test]
    fn pending_excludes_stored_and_duplicate_ids() {
        let remote = vec![record("a"), record("b"), record("a"), record("c")];
        let existing = vec![record("b")];

        let ids: Vec<_> = pending_records(remote, &existing)
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn pending_record_serializes_languages() {
        let json = serde_json::to_value(PendingRecord::from(record("a"))).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["languages"], serde_json::json!(["rust"]));
        assert_eq!(json["completed_at"], "2024-05-01T12:00:00.000Z");
    }
}
