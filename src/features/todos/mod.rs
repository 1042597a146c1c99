//! Todos module - the in-memory todo list state
//!
//! This module provides:
//! - The `Todo` record as served by the remote API
//! - The completion-based view filter (All / Active / Completed)
//! - `TodoStore`, the single owner of the list between network round-trips

pub mod store;

// Re-export commonly used types
pub use store::{validate_title, Filter, Todo, TodoStore, TEMP_TODO_ID};
