use kata_config::SyncConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &SyncConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Sync(args) => commands::sync::handle(&args, config, flags).await,
        Commands::Pending => commands::pending::handle(config, flags).await,
        Commands::List => commands::list::handle(config, flags),
    }
}
