use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::{api, features, shared, ui};
use api::{TodoApi, TodoPatch};
use features::todos::{validate_title, Filter, Todo, TodoStore};
use shared::{Config, Theme, ThemeMode};

/// How long a surfaced error stays on screen before it auto-clears.
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// Fixed user-facing error messages, one per failing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserError {
    LoadTodos,
    TitleEmpty,
    AddTodo,
    DeleteTodo,
    UpdateTodo,
}

impl UserError {
    pub fn message(&self) -> &'static str {
        match self {
            UserError::LoadTodos => "Unable to load todos",
            UserError::TitleEmpty => "Title should not be empty",
            UserError::AddTodo => "Unable to add a todo",
            UserError::DeleteTodo => "Unable to delete a todo",
            UserError::UpdateTodo => "Unable to update a todo",
        }
    }
}

/// Network results reported back to the UI loop by background tasks.
#[derive(Debug)]
pub enum ApiEvent {
    Loaded(Vec<Todo>),
    LoadFailed,
    Created(Todo),
    CreateFailed,
    Updated(Todo),
    UpdateFailed,
    Deleted(i64),
    DeleteFailed,
    /// Every delete of a clear-completed sweep has settled.
    SweepDone,
    /// Every update of a toggle-all fan-out has settled.
    ToggleAllDone,
}

/// Keyboard focus
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing the title of a new todo
    Insert,
    /// Editing the title of the todo with this id
    Edit(i64),
}

/// Main application state
pub struct App {
    /// Flag to indicate if the app should quit
    pub should_quit: bool,
    /// Application configuration
    pub config: Config,
    /// Application theme
    pub theme: Theme,
    /// API client handle, cloned into background tasks
    api: TodoApi,
    /// The todo list, temp todo and view filter
    pub store: TodoStore,
    /// Title buffer for the new-todo input; kept when a create fails
    pub input: String,
    /// Title buffer while editing an existing todo
    pub edit_buffer: String,
    /// Current keyboard focus
    pub mode: InputMode,
    /// Selection index into the visible todos
    pub selected: usize,
    /// Transient error and when it was shown
    error: Option<(UserError, Instant)>,
    /// A create/update/delete round-trip is in flight
    pub loading: bool,
    /// A toggle-all fan-out is in flight
    pub toggling_all: bool,
    /// A clear-completed sweep is in flight; per-item results must not
    /// clear the loading flag while this is set
    sweeping: bool,
    /// Spinner animation state
    spinner_frame: usize,
    last_spinner_update: Instant,
    /// Flag to indicate if UI needs redraw
    needs_redraw: bool,
    /// Background task result channel
    events_tx: mpsc::UnboundedSender<ApiEvent>,
    events_rx: mpsc::UnboundedReceiver<ApiEvent>,
}

impl App {
    /// Create a new App instance and kick off the initial load
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let mut app = Self::with_config(config);
        app.reload();
        Ok(app)
    }

    /// Build the app from an explicit config without touching disk or
    /// network. The initial load is not started.
    fn with_config(config: Config) -> Self {
        let theme = theme_for(&config.theme_mode);
        let api = TodoApi::new(&config.api_base_url, config.user_id);
        let (events_tx, events_rx) = mpsc::unbounded_channel::<ApiEvent>();

        Self {
            should_quit: false,
            config,
            theme,
            api,
            store: TodoStore::new(),
            input: String::new(),
            edit_buffer: String::new(),
            mode: InputMode::Normal,
            selected: 0,
            error: None,
            loading: false,
            toggling_all: false,
            sweeping: false,
            spinner_frame: 0,
            last_spinner_update: Instant::now(),
            needs_redraw: true,
            events_tx,
            events_rx,
        }
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        if !IsTty::is_tty(&io::stdout()) {
            eprintln!("This application requires a TTY terminal to run.");
            return Ok(());
        }

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        while !self.should_quit {
            // Update spinner animation if a request is in flight
            if self.is_loading() {
                self.spinner_char();
                self.needs_redraw = true;
            }

            // Apply background network results
            while let Ok(event) = self.events_rx.try_recv() {
                self.on_event(event);
                self.needs_redraw = true;
            }

            // Auto-clear stale errors
            self.update_error(ERROR_DISMISS_AFTER);

            // Only redraw if something changed
            if self.needs_redraw {
                terminal.draw(|f| ui::draw(f, self))?;
                self.needs_redraw = false;
            }

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key.code, key.modifiers);
                    self.needs_redraw = true;
                }
            }
        }

        // Save current configuration before exiting
        self.config.save()?;

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Whether any network operation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading || self.toggling_all || self.sweeping
    }

    /// Advance and return the spinner glyph
    pub fn spinner_char(&mut self) -> char {
        const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

        // Update spinner every 100ms
        if self.last_spinner_update.elapsed().as_millis() > 100 {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
            self.last_spinner_update = Instant::now();
        }

        SPINNER_CHARS[self.spinner_frame]
    }

    /// Surface one of the fixed error messages
    pub fn show_error(&mut self, error: UserError) {
        self.error = Some((error, Instant::now()));
        self.needs_redraw = true;
    }

    /// The currently visible error, if any
    pub fn error(&self) -> Option<UserError> {
        self.error.map(|(e, _)| e)
    }

    /// Clear the error once it is older than the given age
    pub fn update_error(&mut self, max_age: Duration) {
        if let Some((_, shown_at)) = self.error {
            if shown_at.elapsed() >= max_age {
                self.error = None;
                self.needs_redraw = true;
            }
        }
    }

    /// Apply a background network result to the application state
    fn on_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Loaded(todos) => {
                self.store.set_all(todos);
                self.loading = false;
                self.clamp_selection();
            }
            ApiEvent::LoadFailed => {
                self.loading = false;
                self.show_error(UserError::LoadTodos);
            }
            ApiEvent::Created(todo) => {
                self.store.insert(todo);
                self.store.clear_temp();
                self.input.clear();
                self.loading = false;
            }
            ApiEvent::CreateFailed => {
                self.store.clear_temp();
                self.loading = false;
                self.show_error(UserError::AddTodo);
            }
            ApiEvent::Updated(todo) => {
                self.store.apply(todo);
                self.loading = false;
                self.clamp_selection();
            }
            ApiEvent::UpdateFailed => {
                self.loading = false;
                self.show_error(UserError::UpdateTodo);
            }
            ApiEvent::Deleted(id) => {
                self.store.remove(id);
                if !self.sweeping {
                    self.loading = false;
                }
                self.clamp_selection();
            }
            ApiEvent::DeleteFailed => {
                if !self.sweeping {
                    self.loading = false;
                }
                self.show_error(UserError::DeleteTodo);
            }
            ApiEvent::SweepDone => {
                self.sweeping = false;
                self.loading = false;
            }
            ApiEvent::ToggleAllDone => {
                self.toggling_all = false;
            }
        }
    }

    /// Keep the selection inside the visible list after mutations
    fn clamp_selection(&mut self) {
        let visible = self.store.visible().len();
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    /// Handle keyboard input
    fn handle_key_event(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Ctrl+C always quits, regardless of mode
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Handle help overlay first
        if self.config.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Char('/') | KeyCode::Esc) {
                self.config.toggle_help();
                let _ = self.config.save();
            }
            return;
        }

        match self.mode {
            InputMode::Insert => self.handle_insert_key(key),
            InputMode::Edit(id) => self.handle_edit_key(key, id),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_insert_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.submit_new(),
            KeyCode::Esc => self.mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode, id: i64) {
        match key {
            KeyCode::Enter => self.submit_edit(id),
            KeyCode::Esc => {
                self.edit_buffer.clear();
                self.mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => self.edit_buffer.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Char('i') | KeyCode::Char('n') => self.mode = InputMode::Insert,
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(),
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Char('c') => self.clear_completed(),
            KeyCode::Tab => self.set_filter(self.store.filter().next()),
            KeyCode::Char('1') | KeyCode::Char('2') | KeyCode::Char('3') => {
                if let KeyCode::Char(c) = key {
                    let index = c as usize - '1' as usize;
                    self.set_filter(Filter::from_index(index));
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('?') | KeyCode::Char('/') => {
                self.config.toggle_help();
                let _ = self.config.save();
            }
            _ => {}
        }
    }

    /// Move selection down in the visible todo list
    fn move_selection_down(&mut self) {
        let visible = self.store.visible().len();
        if visible > 0 {
            self.selected = (self.selected + 1) % visible;
        }
    }

    /// Move selection up in the visible todo list
    fn move_selection_up(&mut self) {
        let visible = self.store.visible().len();
        if visible > 0 {
            self.selected = if self.selected == 0 {
                visible - 1
            } else {
                self.selected - 1
            };
        }
    }

    /// Id of the currently selected visible todo
    fn selected_id(&self) -> Option<i64> {
        self.store.visible().get(self.selected).map(|t| t.id)
    }

    fn set_filter(&mut self, filter: Filter) {
        self.store.set_filter(filter);
        self.clamp_selection();
    }

    /// Cycle theme mode and persist the choice
    fn cycle_theme(&mut self) {
        let next = self.config.next_theme_mode();
        self.config.set_theme_mode(next);
        let _ = self.config.save();
        self.theme = theme_for(&self.config.theme_mode);
    }

    /// Fetch the whole list from the server
    pub fn reload(&mut self) {
        self.loading = true;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.list().await {
                Ok(todos) => {
                    let _ = tx.send(ApiEvent::Loaded(todos));
                }
                Err(_) => {
                    let _ = tx.send(ApiEvent::LoadFailed);
                }
            }
        });
    }

    /// Submit the new-todo input. An empty title never reaches the network;
    /// the input buffer is only cleared once the server confirms the create.
    fn submit_new(&mut self) {
        let Some(title) = validate_title(&self.input) else {
            self.show_error(UserError::TitleEmpty);
            return;
        };

        self.loading = true;
        self.store.begin_create(&title);

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.create(&title).await {
                Ok(todo) => {
                    let _ = tx.send(ApiEvent::Created(todo));
                }
                Err(_) => {
                    let _ = tx.send(ApiEvent::CreateFailed);
                }
            }
        });
    }

    /// Start editing the selected todo's title
    fn begin_edit(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Some(todo) = self.store.get(id) {
                self.edit_buffer = todo.title.clone();
                self.mode = InputMode::Edit(id);
            }
        }
    }

    /// Save an edited title via a partial update
    fn submit_edit(&mut self, id: i64) {
        let Some(title) = validate_title(&self.edit_buffer) else {
            self.show_error(UserError::TitleEmpty);
            return;
        };

        self.edit_buffer.clear();
        self.mode = InputMode::Normal;
        self.spawn_update(id, TodoPatch::title(title));
    }

    /// Flip the completion state of the selected todo
    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Some(todo) = self.store.get(id) {
                self.spawn_update(id, TodoPatch::completed(!todo.completed));
            }
        }
    }

    fn spawn_update(&mut self, id: i64, patch: TodoPatch) {
        self.loading = true;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.update(id, &patch).await {
                Ok(todo) => {
                    let _ = tx.send(ApiEvent::Updated(todo));
                }
                Err(_) => {
                    let _ = tx.send(ApiEvent::UpdateFailed);
                }
            }
        });
    }

    /// Delete the selected todo
    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };

        self.loading = true;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.delete(id).await {
                Ok(()) => {
                    let _ = tx.send(ApiEvent::Deleted(id));
                }
                Err(_) => {
                    let _ = tx.send(ApiEvent::DeleteFailed);
                }
            }
        });
    }

    /// Delete every completed todo. One request per todo, issued
    /// concurrently; each settles independently and the loading flag only
    /// clears after all of them have.
    fn clear_completed(&mut self) {
        let ids = self.store.completed_ids();
        if ids.is_empty() {
            return;
        }

        self.loading = true;
        self.sweeping = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let mut requests = JoinSet::new();
            for id in ids {
                let api = api.clone();
                requests.spawn(async move { (id, api.delete(id).await) });
            }

            while let Some(settled) = requests.join_next().await {
                match settled {
                    Ok((id, Ok(()))) => {
                        let _ = tx.send(ApiEvent::Deleted(id));
                    }
                    Ok((_, Err(_))) | Err(_) => {
                        let _ = tx.send(ApiEvent::DeleteFailed);
                    }
                }
            }

            let _ = tx.send(ApiEvent::SweepDone);
        });
    }

    /// Complete every todo, or reactivate all of them when everything is
    /// already completed. One PATCH per differing todo, issued concurrently.
    fn toggle_all(&mut self) {
        let (target, ids) = self.store.toggle_targets();
        if ids.is_empty() {
            return;
        }

        self.toggling_all = true;

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let mut requests = JoinSet::new();
            for id in ids {
                let api = api.clone();
                let patch = TodoPatch::completed(target);
                requests.spawn(async move { api.update(id, &patch).await });
            }

            while let Some(settled) = requests.join_next().await {
                match settled {
                    Ok(Ok(todo)) => {
                        let _ = tx.send(ApiEvent::Updated(todo));
                    }
                    Ok(Err(_)) | Err(_) => {
                        let _ = tx.send(ApiEvent::UpdateFailed);
                    }
                }
            }

            let _ = tx.send(ApiEvent::ToggleAllDone);
        });
    }
}

fn theme_for(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::dark(),
        ThemeMode::Light => Theme::light(),
        ThemeMode::Ocean => Theme::ocean(),
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

    fn test_app() -> App {
        App::with_config(Config::default())
    }

    #[test]
    fn test_error_messages_are_fixed() {
        assert_eq!(UserError::LoadTodos.message(), "Unable to load todos");
        assert_eq!(UserError::TitleEmpty.message(), "Title should not be empty");
        assert_eq!(UserError::AddTodo.message(), "Unable to add a todo");
        assert_eq!(UserError::DeleteTodo.message(), "Unable to delete a todo");
        assert_eq!(UserError::UpdateTodo.message(), "Unable to update a todo");
    }

    #[test]
    fn test_empty_title_is_rejected_without_network() {
        let mut app = test_app();
        app.input = "   ".to_string();

        app.submit_new();

        assert_eq!(app.error(), Some(UserError::TitleEmpty));
        assert!(!app.loading);
        assert!(app.store.temp().is_none());
    }

    #[test]
    fn test_empty_edit_is_rejected_and_stays_in_edit_mode() {
        let mut app = test_app();
        app.store.set_all(vec![todo(1, "water plants", false)]);
        app.mode = InputMode::Edit(1);
        app.edit_buffer = " ".to_string();

        app.submit_edit(1);

        assert_eq!(app.error(), Some(UserError::TitleEmpty));
        assert_eq!(app.mode, InputMode::Edit(1));
    }

    #[test]
    fn test_error_auto_clears_after_delay() {
        let mut app = test_app();
        app.show_error(UserError::AddTodo);
        assert_eq!(app.error(), Some(UserError::AddTodo));

        // Not old enough yet
        app.update_error(Duration::from_secs(60));
        assert_eq!(app.error(), Some(UserError::AddTodo));

        // Past the dismiss age
        app.update_error(Duration::ZERO);
        assert_eq!(app.error(), None);
    }

    #[test]
    fn test_created_event_confirms_create() {
        let mut app = test_app();
        app.input = "buy milk".to_string();
        app.store.begin_create("buy milk");
        app.loading = true;

        app.on_event(ApiEvent::Created(todo(7, "buy milk", false)));

        assert_eq!(app.store.todos().len(), 1);
        assert_eq!(app.store.todos()[0].id, 7);
        assert!(app.store.temp().is_none());
        assert!(app.input.is_empty());
        assert!(!app.loading);
    }

    #[test]
    fn test_failed_create_keeps_input_and_shows_error() {
        let mut app = test_app();
        app.input = "buy milk".to_string();
        app.store.begin_create("buy milk");
        app.loading = true;

        app.on_event(ApiEvent::CreateFailed);

        assert!(app.store.is_empty());
        assert!(app.store.temp().is_none());
        assert_eq!(app.input, "buy milk");
        assert_eq!(app.error(), Some(UserError::AddTodo));
        assert!(!app.loading);
    }

    #[test]
    fn test_sweep_removes_successes_despite_failures() {
        let mut app = test_app();
        app.on_event(ApiEvent::Loaded(vec![
            todo(1, "keep", false),
            todo(2, "done a", true),
            todo(3, "done b", true),
            todo(4, "done c", true),
        ]));

        app.loading = true;
        app.sweeping = true;

        // Requests settle in arbitrary order; one of them fails
        app.on_event(ApiEvent::Deleted(4));
        app.on_event(ApiEvent::DeleteFailed);
        app.on_event(ApiEvent::Deleted(2));

        // Still loading until every request has settled
        assert!(app.is_loading());

        app.on_event(ApiEvent::SweepDone);

        let ids: Vec<i64> = app.store.todos().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(app.error(), Some(UserError::DeleteTodo));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_updated_event_replaces_todo() {
        let mut app = test_app();
        app.on_event(ApiEvent::Loaded(vec![todo(1, "old title", false)]));

        app.on_event(ApiEvent::Updated(todo(1, "new title", true)));

        assert_eq!(app.store.todos()[0].title, "new title");
        assert!(app.store.todos()[0].completed);
    }

    #[test]
    fn test_selection_clamps_when_visible_list_shrinks() {
        let mut app = test_app();
        app.on_event(ApiEvent::Loaded(vec![
            todo(1, "a", false),
            todo(2, "b", false),
            todo(3, "c", false),
        ]));
        app.selected = 2;

        app.on_event(ApiEvent::Deleted(3));
        assert_eq!(app.selected, 1);

        app.on_event(ApiEvent::Deleted(1));
        app.on_event(ApiEvent::Deleted(2));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_load_failure_surfaces_fixed_message() {
        let mut app = test_app();
        app.loading = true;

        app.on_event(ApiEvent::LoadFailed);

        assert_eq!(app.error(), Some(UserError::LoadTodos));
        assert!(!app.loading);
    }
}
