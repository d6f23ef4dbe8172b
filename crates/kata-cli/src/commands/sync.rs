use anyhow::Context;
use kata_catalog::CatalogClient;
use kata_config::SyncConfig;
use kata_publish::GitPublisher;
use kata_session::{Scraper, WebDriverSession};
use kata_store::RecordStore;

use crate::cli::{GlobalFlags, SyncArgs};
use crate::output::output;
use crate::progress::Progress;
use crate::sync::{SyncOptions, SyncPipeline};

/// Handle `kata-sync sync`.
pub async fn handle(
    args: &SyncArgs,
    config: &SyncConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    config.validate_for_sync()?;
    let repo_dir = config.repo.require_local_path()?;

    let catalog =
        CatalogClient::with_timeout(&config.api.base_url, config.api_user(), config.api.timeout())?
            .with_all_pages(config.api.all_pages);
    let store = RecordStore::in_dir(repo_dir);
    let publisher = GitPublisher::new(repo_dir, store.path())
        .with_branch(config.repo.branch.clone())
        .with_remote(config.repo.remote.clone())
        .with_timeout(config.git.timeout());
    let scraper = Scraper::new(config.browser.selectors.clone(), config.browser.wait_timeout());

    let pipeline = SyncPipeline {
        catalog: &catalog,
        store: &store,
        publisher: &publisher,
        scraper: &scraper,
        account: &config.account,
        options: SyncOptions {
            publish: !args.no_publish,
            require_login: config.browser.require_login,
        },
    };

    let mut session = WebDriverSession::connect(&config.browser)
        .await
        .context("failed to start browser session")?;
    let mut progress = Progress::hidden();
    let result = pipeline.run(&mut session, &mut progress).await;

    if let Err(error) = session.close().await {
        tracing::warn!(%error, "failed to close browser session");
    }

    let report = result?;
    tracing::info!(new = report.new_count(), stored = report.stored, "sync finished");
    output(&report, flags.format)
}
