//! todo - A small todo list kept in a local JSON file
//!
//! The list is loaded once at startup and written back after every change.
//! Unreadable saved data is treated as an empty list.

pub mod list;
pub mod store;

pub use list::{Filter, TodoError, TodoItem, TodoList};
pub use store::TodoStore;
