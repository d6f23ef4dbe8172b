use kata_core::{ChallengeId, ChallengeRecord, CompletedAt};
use kata_publish::{PublishError, PublishOutcome};
use kata_session::SkippedLanguage;
use serde::Serialize;

/// Summary of one sync run, printed by `kata-sync sync`.
#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub login: String,
    pub remote_records: usize,
    pub existing_records: usize,
    /// Ids the catalog returned more than once; only the first was kept.
    pub duplicate_ids: Vec<ChallengeId>,
    /// Whether the store file was rewritten.
    pub stored: bool,
    pub records: Vec<RecordReport>,
}

impl SyncReport {
    #[must_use]
    pub fn new_count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Serialize)]
pub struct RecordReport {
    pub id: ChallengeId,
    pub name: String,
    pub completed_at: CompletedAt,
    pub solutions: usize,
    pub skipped_languages: Vec<SkippedLanguage>,
    pub publish: PublishStatus,
}

impl RecordReport {
    pub fn new(record: &ChallengeRecord, skipped_languages: Vec<SkippedLanguage>) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            completed_at: record.completed_at.clone(),
            solutions: record.solution_count(),
            skipped_languages,
            publish: PublishStatus::Disabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    Committed,
    NothingToCommit,
    /// Publishing was turned off for this run.
    Disabled,
    /// The working copy is not a git work tree.
    Skipped { reason: String },
    Failed { error: String },
}

impl From<Result<PublishOutcome, PublishError>> for PublishStatus {
    fn from(result: Result<PublishOutcome, PublishError>) -> Self {
        match result {
            Ok(PublishOutcome::Committed) => Self::Committed,
            Ok(PublishOutcome::NothingToCommit) => Self::NothingToCommit,
            Err(error) if error.is_not_a_repository() => Self::Skipped {
                reason: error.to_string(),
            },
            Err(error) => Self::Failed {
                error: error.to_string(),
            },
        }
    }
}
