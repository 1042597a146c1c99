//! REST client for the todo API
//!
//! Four endpoints, all scoped to a single user via the `userId` query
//! parameter: list, create, update (PATCH with partial payloads) and delete.

pub mod client;
pub mod types;

// Re-export commonly used types
pub use client::TodoApi;
pub use types::{NewTodo, TodoPatch};
