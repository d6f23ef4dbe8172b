use anyhow::Context;
use kata_config::SyncConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, then apply CLI overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SyncConfig> {
    load_dotenv(flags)?;

    let mut config = SyncConfig::load().context("failed to load configuration")?;
    if let Some(repo) = &flags.repo {
        config.repo.local_path.clone_from(repo);
    }

    if !config.repo.remote_id.is_empty() {
        tracing::info!(remote_id = %config.repo.remote_id, "target repository");
    }
    Ok(config)
}

/// Prefer the working copy's `.env` when `--repo` is given, else the
/// current directory's.
fn load_dotenv(flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(repo) = &flags.repo {
        let env_path = repo.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}
