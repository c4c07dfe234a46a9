//! Command implementations for the CLI interface.
//!
//! `chat` runs the interactive loop; `say` answers a single line, which is handy for
//! scripting; `list` prints the stored tasks without going through the chat.

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::chat::Assistant;
use crate::codec::to_line;
use crate::db::TaskList;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (the default).
    Chat,

    /// Send one chat line and print the reply, e.g. `rapgod say todo read book`.
    Say {
        /// The chat line, as separate words.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Print the stored tasks.
    List {
        /// Print as JSON instead of task lines.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn open_assistant(data_path: &Path) -> Assistant {
    match Assistant::with_data_file(data_path) {
        Ok(bot) => bot,
        Err(e) => {
            eprintln!("Failed to load tasks from {}: {}", data_path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Run the chat loop on stdin/stdout until the user says bye or input ends.
pub fn cmd_chat(data_path: &Path) {
    let mut bot = open_assistant(data_path);
    println!("{}", Assistant::greeting());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        if let Err(e) = write_prompt(&mut stdout) {
            eprintln!("Failed to write prompt: {}", e);
            std::process::exit(1);
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                std::process::exit(1);
            }
        }
        if line.trim().is_empty() {
            continue;
        }

        let reply = bot.respond(&line);
        println!("{}", reply.text);
        if reply.exit {
            break;
        }
    }
}

fn write_prompt(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"> ")?;
    out.flush()
}

/// Answer a single chat line.
pub fn cmd_say(data_path: &Path, words: Vec<String>) {
    let mut bot = open_assistant(data_path);
    println!("{}", bot.respond(&words.join(" ")).text);
}

/// Print the stored tasks as numbered lines or JSON.
pub fn cmd_list(data_path: &Path, json: bool) {
    let list = match TaskList::load(data_path) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("Failed to load tasks from {}: {}", data_path.display(), e);
            std::process::exit(1);
        }
    };
    match render_list(&list, json) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Failed to serialise tasks: {}", e);
            std::process::exit(1);
        }
    }
}

fn render_list(list: &TaskList, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(list.tasks());
    }
    Ok(list
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}.{}", i + 1, to_line(t)))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}
