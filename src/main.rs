//! # RapGod - chat-style todo assistant
//!
//! Talk to it in plain commands and it keeps track of to-dos, deadlines and events.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start chatting
//! rapgod
//!
//! # Or send a single line
//! rapgod say deadline submit report /by 02/12/2024 1800
//!
//! # Show what's stored
//! rapgod list --json
//! ```
//!
//! ## Chat commands
//!
//! - `todo <description>`
//! - `deadline <description> /by <when>`
//! - `event <description> /from <when> /to <when>`
//! - `list`, `find <keyword>`, `mark <n>`, `unmark <n>`, `delete <n>`, `bye`
//!
//! `<when>` accepts `02/12/2024 1800`, `02/12/2024`, `Dec 02 2024` or `Dec 2 2024 6:00pm`.
//!
//! Tasks are stored one per line in `~/.rapgod/tasks.txt` (override with `--data`).
//! Set `RUST_LOG=debug` to see how dates and files are being read.

use std::path::PathBuf;

use clap::Parser;

pub mod chat;
pub mod cli;
pub mod cmd;
pub mod codec;
pub mod dates;
pub mod db;
pub mod error;
pub mod task;

use cli::Cli;
use cmd::*;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Chat);
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return;
    }

    // Determine the task file
    let data_path = cli.data.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".rapgod");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("tasks.txt")
    });
    log::debug!("Using task file {}", data_path.display());

    match command {
        Commands::Chat => cmd_chat(&data_path),
        Commands::Say { words } => cmd_say(&data_path, words),
        Commands::List { json } => cmd_list(&data_path, json),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
