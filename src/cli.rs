use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Chat-style todo assistant.
/// Storage defaults to ~/.rapgod/tasks.txt or a path passed via --data.
#[derive(Parser)]
#[command(name = "rapgod", version, about = "Chat-style todo assistant")]
pub struct Cli {
    /// Path to the task file.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
