//! The sync pipeline: sign in, fetch, diff, scrape, merge, persist, publish.
//!
//! Every collaborator comes in through a trait so the whole run can be
//! exercised without a browser, network or git remote.

mod report;

pub use report::{PublishStatus, RecordReport, SyncReport};

use anyhow::{Context, bail};
use kata_catalog::ChallengeDirectory;
use kata_config::AccountConfig;
use kata_core::{ChallengeRecord, dedupe_by_id, new_records};
use kata_publish::Publisher;
use kata_session::{LanguageScrape, LoginOutcome, RecordScrape, Scraper, SessionDriver};
use kata_store::RecordStore;

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Commit and push after the store is written.
    pub publish: bool,
    /// Abort before any write when sign-in does not complete.
    pub require_login: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            publish: true,
            require_login: false,
        }
    }
}

/// Hooks for reporting scrape progress.
pub trait SyncObserver {
    fn scraping_started(&mut self, _languages: usize) {}
    fn language_finished(&mut self, _record: &ChallengeRecord, _outcome: &LanguageScrape) {}
    fn scraping_finished(&mut self) {}
}

impl SyncObserver for () {}

pub struct SyncPipeline<'a, C, P> {
    pub catalog: &'a C,
    pub store: &'a RecordStore,
    pub publisher: &'a P,
    pub scraper: &'a Scraper,
    pub account: &'a AccountConfig,
    pub options: SyncOptions,
}

impl<C: ChallengeDirectory, P: Publisher> SyncPipeline<'_, C, P> {
    /// Run one sync against an already-connected session.
    ///
    /// Nothing is written unless login (when required), fetch, store load and
    /// every scrape succeed. Publish failures never fail the run; they are
    /// recorded per record in the report.
    pub async fn run<D, O>(&self, session: &mut D, observer: &mut O) -> anyhow::Result<SyncReport>
    where
        D: SessionDriver,
        O: SyncObserver,
    {
        let login = self.login(session).await?;

        tracing::info!("fetching completed challenges");
        let remote = self
            .catalog
            .fetch_completed()
            .await
            .context("failed to fetch completed challenges")?;
        let existing = self
            .store
            .load()
            .with_context(|| format!("failed to load {}", self.store.path().display()))?;

        let remote_records = remote.len();
        let (remote, duplicate_ids) = dedupe_by_id(remote);
        if !duplicate_ids.is_empty() {
            tracing::warn!(
                ?duplicate_ids,
                "catalog returned duplicate ids; keeping first occurrence"
            );
        }

        let mut fresh = new_records(remote, &existing);
        let mut report = SyncReport {
            login: login.to_string(),
            remote_records,
            existing_records: existing.len(),
            duplicate_ids,
            stored: false,
            records: Vec::with_capacity(fresh.len()),
        };

        if fresh.is_empty() {
            tracing::info!("no new katas found");
            return Ok(report);
        }
        tracing::info!(count = fresh.len(), "found new katas");

        let scraped = self.scrape_all(session, &fresh, observer).await;
        observer.scraping_finished();
        let scraped = scraped?;

        for (record, scrape) in fresh.iter_mut().zip(scraped) {
            record.attach_solutions(scrape.solutions);
            report.records.push(RecordReport::new(record, scrape.skipped));
        }

        let mut all = existing;
        all.extend_from_slice(&fresh);
        self.store
            .save(&all)
            .with_context(|| format!("failed to write {}", self.store.path().display()))?;
        report.stored = true;
        tracing::info!(total = all.len(), path = %self.store.path().display(), "stored katas");

        if self.options.publish {
            for (record, entry) in fresh.iter().zip(report.records.iter_mut()) {
                entry.publish = self.publish(record).await;
            }
        } else {
            tracing::info!("publishing disabled for this run");
        }

        Ok(report)
    }

    async fn login<D: SessionDriver>(&self, session: &mut D) -> anyhow::Result<LoginOutcome> {
        tracing::info!(username = %self.account.username, "signing in");
        let outcome = session
            .login(&self.account.username, &self.account.password)
            .await
            .context("sign-in failed")?;

        if !outcome.is_completed() {
            if self.options.require_login {
                bail!("sign-in did not complete: {outcome}");
            }
            tracing::warn!(%outcome, "sign-in did not complete; continuing");
        }
        Ok(outcome)
    }

    async fn scrape_all<D, O>(
        &self,
        session: &mut D,
        records: &[ChallengeRecord],
        observer: &mut O,
    ) -> anyhow::Result<Vec<RecordScrape>>
    where
        D: SessionDriver,
        O: SyncObserver,
    {
        let languages = records.iter().map(|r| r.completed_languages.len()).sum();
        observer.scraping_started(languages);

        let mut scraped = Vec::with_capacity(records.len());
        for record in records {
            tracing::info!(challenge_id = %record.id, name = %record.name, "collecting solutions");
            let scrape = self
                .scraper
                .scrape_record(session, record, |outcome| {
                    observer.language_finished(record, outcome);
                })
                .await
                .with_context(|| format!("failed to scrape solutions for '{}'", record.name))?;
            scraped.push(scrape);
        }
        Ok(scraped)
    }

    async fn publish(&self, record: &ChallengeRecord) -> PublishStatus {
        let result = self.publisher.publish(record).await;
        match &result {
            Ok(outcome) => tracing::debug!(challenge_id = %record.id, ?outcome, "published"),
            Err(error) if error.is_not_a_repository() => {
                tracing::warn!(challenge_id = %record.id, %error, "skipping publish");
            }
            Err(error) => {
                tracing::error!(challenge_id = %record.id, %error, "publish failed");
            }
        }
        PublishStatus::from(result)
    }
}
