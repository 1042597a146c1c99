use anyhow::Result;

use super::types::{NewTodo, TodoPatch};
use crate::features::todos::Todo;

/// HTTP client for the todo API, scoped to one user.
///
/// Cheap to clone; clones share the underlying connection pool, so each
/// background task can carry its own handle.
#[derive(Debug, Clone)]
pub struct TodoApi {
    client: reqwest::Client,
    base_url: String,
    user_id: u32,
}

impl TodoApi {
    pub fn new(base_url: &str, user_id: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: i64) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    /// Fetch all todos belonging to the configured user.
    pub async fn list(&self) -> Result<Vec<Todo>> {
        let todos = self
            .client
            .get(self.todos_url())
            .query(&[("userId", self.user_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(todos)
    }

    /// Create a todo; the server responds with the stored record including
    /// its assigned id.
    pub async fn create(&self, title: &str) -> Result<Todo> {
        let payload = NewTodo {
            title: title.to_string(),
            completed: false,
            user_id: self.user_id,
        };
        let todo = self
            .client
            .post(self.todos_url())
            .query(&[("userId", self.user_id)])
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(todo)
    }

    /// Apply a partial update and return the updated record.
    pub async fn update(&self, id: i64, patch: &TodoPatch) -> Result<Todo> {
        let todo = self
            .client
            .patch(self.todo_url(id))
            .query(&[("userId", self.user_id)])
            .json(patch)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete(self.todo_url(id))
            .query(&[("userId", self.user_id)])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let api = TodoApi::new("http://localhost:3000", 1);
        assert_eq!(api.todos_url(), "http://localhost:3000/todos");
        assert_eq!(api.todo_url(42), "http://localhost:3000/todos/42");
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let api = TodoApi::new("http://localhost:3000/", 1);
        assert_eq!(api.todos_url(), "http://localhost:3000/todos");
    }
}
