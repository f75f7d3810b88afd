//! Todo items and list operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors looking up an item by id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("No todo matches id: {0}")]
    NotFound(String),

    #[error("Id prefix is ambiguous: {0}")]
    Ambiguous(String),
}

/// A single todo entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// First eight characters of the id, enough to address it from the CLI
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Which items to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }

    fn matches(&self, item: &TodoItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !item.completed,
            Filter::Completed => item.completed,
        }
    }
}

/// Todo list, newest item first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<TodoItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Add an item at the top of the list. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<&TodoItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.items.insert(0, TodoItem::new(text));
        self.items.first()
    }

    /// Flip an item's completed flag. Returns false if no item has `id`.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    /// Delete an item. Returns false if no item has `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drop every completed item, returning how many were removed
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        before - self.items.len()
    }

    pub fn filtered(&self, filter: Filter) -> Vec<&TodoItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// Find the single item whose id starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&TodoItem, TodoError> {
        let mut matches = self.items.iter().filter(|item| item.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(item), None) if !prefix.is_empty() => Ok(item),
            (Some(_), _) => Err(TodoError::Ambiguous(prefix.to_string())),
            (None, _) => Err(TodoError::NotFound(prefix.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items not yet completed
    pub fn remaining(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|item| item.completed)
    }
}
