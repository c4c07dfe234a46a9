//! Task list storage.
//!
//! This module provides the `TaskList` struct that owns the ordered tasks shown in the
//! chat, and loads/saves it as one persistence line per task.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::{Error, Result};
use crate::task::Task;

/// In-memory, ordered list of tasks. Task numbers seen by the user are 1-based.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Load tasks from a plain-text file, starting empty if the file doesn't exist.
    ///
    /// Lines that fail to decode are skipped and logged, so one corrupt entry doesn't
    /// lose the rest of the list.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No task file at {}, starting with an empty list", path.display());
            return Ok(TaskList::default());
        }

        let content = fs::read_to_string(path)?;
        let mut tasks = Vec::new();
        for (n, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::parse(line) {
                Ok(task) => tasks.push(task),
                Err(e) => log::warn!("Skipping line {} of {}: {}", n + 1, path.display(), e),
            }
        }
        log::debug!("Loaded {} task(s) from {}", tasks.len(), path.display());
        Ok(TaskList { tasks })
    }

    /// Save tasks using an atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = tmp_path(path);
        let mut f = File::create(&tmp)?;
        for task in &self.tasks {
            writeln!(f, "{}", codec::to_line(task))?;
        }
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Append a task and return its number.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len()
    }

    /// Get a task by its 1-based number.
    pub fn get(&self, number: usize) -> Option<&Task> {
        number.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    /// Remove a task by its 1-based number.
    pub fn remove(&mut self, number: usize) -> Result<Task> {
        let idx = self.index_of(number)?;
        Ok(self.tasks.remove(idx))
    }

    /// Set the completion flag of a task by its 1-based number.
    pub fn set_done(&mut self, number: usize, done: bool) -> Result<&Task> {
        let idx = self.index_of(number)?;
        let task = &mut self.tasks[idx];
        task.set_done(done);
        Ok(task)
    }

    /// Tasks whose description contains `keyword` (case-insensitive), with their numbers.
    pub fn find(&self, keyword: &str) -> Vec<(usize, &Task)> {
        let needle = keyword.to_lowercase();
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.description().to_lowercase().contains(&needle))
            .map(|(i, t)| (i + 1, t))
            .collect()
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.tasks.len() {
            return Err(Error::InvalidIndex(number.to_string()));
        }
        Ok(number - 1)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
