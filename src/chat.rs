//! Chat command parsing and dispatch.
//!
//! Each line the user types is parsed into a [`Command`] and applied to the task list by
//! the [`Assistant`], which answers with a [`Reply`]. Mutating commands save the list
//! straight away when a data file is configured.

use std::path::{Path, PathBuf};

use crate::codec::{check_description, to_line};
use crate::dates::parse_date_time;
use crate::db::TaskList;
use crate::error::{Error, Result};
use crate::task::Task;

pub const GREETING: &str = "Yo! I'm RapGod, keeper of your to-dos.\nWhat can I do for you?";
pub const FAREWELL: &str = "Peace out! Catch you on the flip side!";

/// A parsed chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Bye,
    Add(Task),
    Mark(usize),
    Unmark(usize),
    Delete(usize),
    Find(String),
}

impl Command {
    /// Parse a chat line. Command words are case-insensitive.
    ///
    /// ```text
    /// todo <description>
    /// deadline <description> /by <when>
    /// event <description> /from <when> /to <when>
    /// mark <n> | unmark <n> | delete <n>
    /// find <keyword>
    /// list | bye
    /// ```
    pub fn parse(input: &str) -> Result<Command> {
        let input = input.trim();
        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word.to_lowercase().as_str() {
            "list" => Ok(Command::List),
            "bye" => Ok(Command::Bye),
            "todo" => Ok(Command::Add(Task::todo(non_empty(rest, "todo")?))),
            "deadline" => parse_deadline(rest),
            "event" => parse_event(rest),
            "mark" => Ok(Command::Mark(parse_number(rest)?)),
            "unmark" => Ok(Command::Unmark(parse_number(rest)?)),
            "delete" => Ok(Command::Delete(parse_number(rest)?)),
            "find" => {
                if rest.is_empty() {
                    return Err(Error::MissingArgument { command: "find", flag: "keyword" });
                }
                Ok(Command::Find(rest.to_string()))
            }
            _ => Err(Error::UnknownCommand(input.to_string())),
        }
    }

    /// Whether running the command changes the list.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::Add(_) | Command::Mark(_) | Command::Unmark(_) | Command::Delete(_)
        )
    }
}

fn non_empty<'a>(text: &'a str, noun: &'static str) -> Result<&'a str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyDescription(noun));
    }
    check_description(text)?;
    Ok(text)
}

fn parse_deadline(rest: &str) -> Result<Command> {
    let (desc, by) = rest
        .split_once("/by")
        .ok_or_else(|| missing_or_empty(rest, "deadline", "/by"))?;
    let desc = non_empty(desc, "deadline")?;
    Ok(Command::Add(Task::deadline(desc, parse_date_time(by)?)))
}

fn parse_event(rest: &str) -> Result<Command> {
    let (desc, times) = rest
        .split_once("/from")
        .ok_or_else(|| missing_or_empty(rest, "event", "/from"))?;
    let desc = non_empty(desc, "event")?;
    let (from, to) = times
        .split_once("/to")
        .ok_or(Error::MissingArgument { command: "event", flag: "/to" })?;
    Ok(Command::Add(Task::event(desc, parse_date_time(from)?, parse_date_time(to)?)))
}

fn missing_or_empty(rest: &str, command: &'static str, flag: &'static str) -> Error {
    if rest.trim().is_empty() {
        Error::EmptyDescription(command)
    } else {
        Error::MissingArgument { command, flag }
    }
}

fn parse_number(rest: &str) -> Result<usize> {
    rest.parse::<usize>()
        .map_err(|_| Error::InvalidIndex(rest.to_string()))
}

/// What the assistant says back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Set once the user said goodbye.
    pub exit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Reply { text: text.into(), exit: false }
    }
}

/// Owns the task list for a chat session.
#[derive(Debug, Default)]
pub struct Assistant {
    list: TaskList,
    data_path: Option<PathBuf>,
}

impl Assistant {
    /// Load the task file at `path` and save back to it after every change.
    pub fn with_data_file(path: &Path) -> Result<Self> {
        Ok(Assistant {
            list: TaskList::load(path)?,
            data_path: Some(path.to_path_buf()),
        })
    }

    pub fn greeting() -> &'static str {
        GREETING
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Answer one chat line. Errors are turned into reply text.
    pub fn respond(&mut self, input: &str) -> Reply {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => return Reply::say(format!("Yo, {e}")),
        };
        let mutates = command.mutates();

        let mut reply = match self.execute(command) {
            Ok(reply) => reply,
            Err(e) => return Reply::say(format!("Yo, {e}")),
        };

        if mutates {
            if let Err(e) = self.persist() {
                log::warn!("Failed to save tasks: {}", e);
                reply.text.push_str(&format!("\n(Heads up: I couldn't save that. {e})"));
            }
        }
        reply
    }

    fn execute(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Bye => Reply { text: FAREWELL.to_string(), exit: true },
            Command::List => Reply::say(self.render_list()),
            Command::Add(task) => {
                let line = to_line(&task);
                let count = self.list.add(task);
                Reply::say(format!(
                    "Got it. I've added this task:\n  {line}\nNow you have {count} {} in the list.",
                    plural(count)
                ))
            }
            Command::Mark(n) => {
                let task = self.list.set_done(n, true)?;
                Reply::say(format!("Nice! I've marked this task as done:\n  {}", to_line(task)))
            }
            Command::Unmark(n) => {
                let task = self.list.set_done(n, false)?;
                Reply::say(format!("OK, I've marked this task as not done yet:\n  {}", to_line(task)))
            }
            Command::Delete(n) => {
                let task = self.list.remove(n)?;
                let count = self.list.len();
                Reply::say(format!(
                    "Noted. I've removed this task:\n  {}\nNow you have {count} {} in the list.",
                    to_line(&task),
                    plural(count)
                ))
            }
            Command::Find(keyword) => {
                let hits = self.list.find(&keyword);
                if hits.is_empty() {
                    Reply::say(format!("No tasks match '{keyword}'."))
                } else {
                    let mut text = String::from("Here are the matching tasks in your list:");
                    for (n, task) in hits {
                        text.push_str(&format!("\n{n}.{}", to_line(task)));
                    }
                    Reply::say(text)
                }
            }
        };
        Ok(reply)
    }

    fn render_list(&self) -> String {
        if self.list.is_empty() {
            return "Your list is empty. Drop a task on me!".to_string();
        }
        let mut text = String::from("Here are the tasks in your list:");
        for (i, task) in self.list.iter().enumerate() {
            text.push_str(&format!("\n{}.{}", i + 1, to_line(task)));
        }
        text
    }

    fn persist(&self) -> Result<()> {
        match &self.data_path {
            Some(path) => self.list.save(path),
            None => Ok(()),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "task" } else { "tasks" }
}
