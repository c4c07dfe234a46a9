//! Task data structure and related functionality.
//!
//! A [`Task`] is a description, a completion flag and a [`TaskKind`] carrying the
//! variant-specific points in time. The display line produced by `Display` is what the
//! chat shows; the persistence line lives in [`crate::codec`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dates::{format_date_time, truncate_to_minute};

/// The three shapes a task can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum TaskKind {
    ToDo,
    Deadline { by: NaiveDateTime },
    /// No ordering is enforced between `from` and `to`.
    Event { from: NaiveDateTime, to: NaiveDateTime },
}

impl TaskKind {
    /// One-letter tag written in the persistence line.
    pub fn tag(&self) -> char {
        match self {
            TaskKind::ToDo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

/// A unit of work. Only the completion flag changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    description: String,
    is_done: bool,
    #[serde(flatten)]
    kind: TaskKind,
}

impl Task {
    /// Points in time are kept to the minute, the precision of the stored line.
    pub fn new(description: impl Into<String>, kind: TaskKind) -> Self {
        let kind = match kind {
            TaskKind::ToDo => TaskKind::ToDo,
            TaskKind::Deadline { by } => TaskKind::Deadline { by: truncate_to_minute(by) },
            TaskKind::Event { from, to } => TaskKind::Event {
                from: truncate_to_minute(from),
                to: truncate_to_minute(to),
            },
        };
        Task {
            description: description.into(),
            is_done: false,
            kind,
        }
    }

    pub fn todo(description: impl Into<String>) -> Self {
        Self::new(description, TaskKind::ToDo)
    }

    pub fn deadline(description: impl Into<String>, by: NaiveDateTime) -> Self {
        Self::new(description, TaskKind::Deadline { by })
    }

    pub fn event(description: impl Into<String>, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self::new(description, TaskKind::Event { from, to })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn set_done(&mut self, done: bool) {
        self.is_done = done;
    }

    /// `"X"` when done, a single space otherwise.
    pub fn mark(&self) -> &'static str {
        if self.is_done {
            "X"
        } else {
            " "
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.mark(), self.description)?;
        match &self.kind {
            TaskKind::ToDo => Ok(()),
            TaskKind::Deadline { by } => write!(f, " (by: {})", format_date_time(by)),
            TaskKind::Event { from, to } => write!(
                f,
                " (from: {} to: {})",
                format_date_time(from),
                format_date_time(to)
            ),
        }
    }
}
