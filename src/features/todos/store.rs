use serde::{Deserialize, Serialize};

/// Sentinel id for the unsaved todo shown while a create is in flight.
/// Real ids are assigned server-side and are never zero.
pub const TEMP_TODO_ID: i64 = 0;

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

/// Completion-based view filter. Purely presentational, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Filter::Active,
            2 => Filter::Completed,
            _ => Filter::All,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn count() -> usize {
        3
    }

    /// Cycle to the next filter (All -> Active -> Completed -> All).
    pub fn next(self) -> Self {
        Filter::from_index((self as usize + 1) % Filter::count())
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Trim a raw title and reject it when nothing remains.
pub fn validate_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The todo list between network round-trips.
///
/// Holds the server-confirmed todos, the single optional temporary todo shown
/// while a create is in flight, and the current view filter. All mutation
/// happens on the UI thread; network tasks report results back and the app
/// applies them here.
#[derive(Debug, Default)]
pub struct TodoStore {
    todos: Vec<Todo>,
    temp: Option<Todo>,
    filter: Filter,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list, e.g. after a (re)load from the server.
    pub fn set_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Todos visible under the current filter, in server order.
    pub fn visible(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| self.filter.matches(t)).collect()
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// Append a server-confirmed todo.
    pub fn insert(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Remove a todo by id. Removing an id that is not present is a no-op,
    /// which keeps concurrent delete results order-independent.
    pub fn remove(&mut self, id: i64) {
        self.todos.retain(|t| t.id != id);
    }

    /// Replace the stored todo that shares the update's id. Updates for ids
    /// that no longer exist (e.g. deleted meanwhile) are dropped.
    pub fn apply(&mut self, updated: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
        }
    }

    pub fn completed_ids(&self) -> Vec<i64> {
        self.todos
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect()
    }

    /// Target state and the ids that need changing for a toggle-all: if any
    /// todo is still active everything becomes completed, otherwise
    /// everything becomes active.
    pub fn toggle_targets(&self) -> (bool, Vec<i64>) {
        let target = !self.all_completed();
        let ids = self
            .todos
            .iter()
            .filter(|t| t.completed != target)
            .map(|t| t.id)
            .collect();
        (target, ids)
    }

    /// Start a create: install the temporary todo, replacing any previous
    /// one so at most a single instance ever exists.
    pub fn begin_create(&mut self, title: &str) -> Todo {
        let temp = Todo {
            id: TEMP_TODO_ID,
            title: title.to_string(),
            completed: false,
        };
        self.temp = Some(temp.clone());
        temp
    }

    /// Drop the temporary todo once the create settled, successfully or not.
    pub fn clear_temp(&mut self) {
        self.temp = None;
    }

    pub fn temp(&self) -> Option<&Todo> {
        self.temp.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: i64, title: &str, completed: bool) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            completed,
        }
    }

    fn store_with(todos: Vec<Todo>) -> TodoStore {
        let mut store = TodoStore::new();
        store.set_all(todos);
        store
    }

    #[test]
    fn test_filters_partition_the_list() {
        let mut store = store_with(vec![
            todo(1, "buy milk", false),
            todo(2, "water plants", true),
            todo(3, "write tests", false),
        ]);

        store.set_filter(Filter::All);
        assert_eq!(store.visible().len(), 3);

        store.set_filter(Filter::Active);
        let active: Vec<i64> = store.visible().iter().map(|t| t.id).collect();
        assert_eq!(active, vec![1, 3]);

        store.set_filter(Filter::Completed);
        let completed: Vec<i64> = store.visible().iter().map(|t| t.id).collect();
        assert_eq!(completed, vec![2]);

        // Active and Completed together cover everything All shows
        assert_eq!(active.len() + completed.len(), store.len());
    }

    #[test]
    fn test_filter_cycle_wraps_around() {
        assert_eq!(Filter::All.next(), Filter::Active);
        assert_eq!(Filter::Active.next(), Filter::Completed);
        assert_eq!(Filter::Completed.next(), Filter::All);
    }

    #[test]
    fn test_counts() {
        let store = store_with(vec![
            todo(1, "a", false),
            todo(2, "b", true),
            todo(3, "c", true),
        ]);

        assert_eq!(store.active_count(), 1);
        assert_eq!(store.completed_count(), 2);
        assert!(!store.all_completed());
        assert_eq!(store.completed_ids(), vec![2, 3]);
    }

    #[test]
    fn test_all_completed_is_false_for_empty_list() {
        let store = TodoStore::new();
        assert!(!store.all_completed());
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  buy milk  "), Some("buy milk".to_string()));
        assert_eq!(validate_title(""), None);
        assert_eq!(validate_title("   \t "), None);
    }

    #[test]
    fn test_apply_replaces_by_id_and_drops_unknown() {
        let mut store = store_with(vec![todo(1, "old", false)]);

        store.apply(todo(1, "new", true));
        assert_eq!(store.get(1).unwrap().title, "new");
        assert!(store.get(1).unwrap().completed);

        // Update for a todo deleted meanwhile is dropped, not inserted
        store.apply(todo(9, "ghost", false));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut store = store_with(vec![todo(1, "a", false)]);
        store.remove(42);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_targets() {
        let store = store_with(vec![
            todo(1, "a", true),
            todo(2, "b", false),
            todo(3, "c", true),
        ]);
        // One active todo left, so everything should become completed
        let (target, ids) = store.toggle_targets();
        assert!(target);
        assert_eq!(ids, vec![2]);

        let store = store_with(vec![todo(1, "a", true), todo(2, "b", true)]);
        // Everything completed, so everything flips back to active
        let (target, ids) = store.toggle_targets();
        assert!(!target);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_temp_todo_is_single_and_cleared() {
        let mut store = TodoStore::new();

        let first = store.begin_create("first");
        assert_eq!(first.id, TEMP_TODO_ID);
        assert!(store.temp().is_some());

        // Starting another create replaces the previous temp todo
        store.begin_create("second");
        assert_eq!(store.temp().unwrap().title, "second");

        store.clear_temp();
        assert!(store.temp().is_none());
        // The temp todo never lands in the confirmed list by itself
        assert!(store.is_empty());
    }

    #[test]
    fn test_partial_bulk_delete_keeps_failed_items() {
        // Clear-completed issues one delete per completed todo; only the
        // successes are removed locally.
        let mut store = store_with(vec![
            todo(1, "keep me", false),
            todo(2, "deleted ok", true),
            todo(3, "delete failed", true),
            todo(4, "deleted ok too", true),
        ]);

        // Server confirmed 2 and 4, request for 3 failed
        store.remove(2);
        store.remove(4);

        let ids: Vec<i64> = store.todos().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.completed_count(), 1);
    }
}
