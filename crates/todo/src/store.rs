//! Todo storage
//!
//! The whole list lives in a single JSON array (`todos.json`). It is read
//! once when a command starts and rewritten after every change. There is no
//! schema version; anything that does not parse as a list of items counts
//! as "no saved data".

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::list::{TodoItem, TodoList};

/// File name of the todo list inside the StudyFlow data directory
pub const TODO_FILE: &str = "todos.json";

/// Todo list store
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    /// Store the list in the file at `path`
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved list. Missing or unreadable data yields an empty list.
    pub fn load(&self) -> Result<TodoList> {
        if !self.path.exists() {
            return Ok(TodoList::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read todo list: {}", self.path.display()))?;

        match serde_json::from_str::<Vec<TodoItem>>(&content) {
            Ok(items) => {
                debug!(count = items.len(), "loaded todo list");
                Ok(TodoList::from_items(items))
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable todo list");
                Ok(TodoList::new())
            }
        }
    }

    /// Write the full list, replacing what was saved before
    pub fn save(&self, list: &TodoList) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = serde_json::to_string(list).context("Failed to serialize todo list")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write todo list: {}", self.path.display()))
    }
}
