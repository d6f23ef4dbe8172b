use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Fetch, scrape, store and publish newly completed katas.
    Sync(SyncArgs),
    /// List completed katas not yet in the local store.
    Pending,
    /// List the katas already in the local store.
    List,
}

#[derive(Clone, Debug, Args)]
pub struct SyncArgs {
    /// Update the store but skip the git commit and push.
    #[arg(long)]
    pub no_publish: bool,
}
