use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, SyncArgs};

/// Top-level CLI parser for the `kata-sync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "kata-sync",
    version,
    about = "Mirror completed Codewars katas and your solutions into a git repository"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Working copy holding completed_kata.json (overrides repo.local_path)
    #[arg(short, long, global = true)]
    pub repo: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            repo: self.repo.clone(),
        }
    }
}
