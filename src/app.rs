//! Application state and lifecycle management.
//!
//! This module contains the `App` struct that holds all dashboard state and
//! coordinates between the TUI, the shortcut repository, the editor, and
//! background command suggestions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::core::{
    expand_path, filter_shortcuts, write_launcher, Config, RepositoryError, ScriptOptions,
    SearchMode, Shortcut, ShortcutRepository, SuggestionService, ViewMode,
};
use crate::editor::{EditorForm, SubmitError, SuggestionRequest, SuggestionTicket};
use crate::tui::Theme;

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Current search input
    pub input: String,

    /// The shortcut collection
    pub repo: ShortcutRepository,

    /// Shortcuts matching the search (indices into the repository list)
    pub filtered: Vec<usize>,

    /// Selected position in `filtered`
    pub selected: usize,

    /// Grid or list
    pub view_mode: ViewMode,

    /// How the search box matches
    pub search_mode: SearchMode,

    /// Cards per row in grid view
    pub grid_columns: usize,

    /// Current mode of the application
    pub mode: AppMode,

    /// Open editor, if any
    pub editor: Option<EditorForm>,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Current UI theme
    pub theme: Theme,

    /// Where launchers are written
    pub output_dir: PathBuf,

    /// Launcher script options
    pub script_options: ScriptOptions,

    suggestions: SuggestionWorker,
}

/// Application modes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Browsing and searching shortcuts
    #[default]
    Normal,

    /// Create/edit form is open
    Editor,

    /// Waiting for the user to confirm deleting a shortcut
    ConfirmDelete(String),

    /// Showing help screen with keyboard shortcuts
    Help,
}

/// Finished suggestion, tagged with the form it was requested for.
#[derive(Debug)]
struct SuggestionResult {
    ticket: SuggestionTicket,
    command: String,
}

/// Runs suggestion requests on the tokio runtime and hands results back.
struct SuggestionWorker {
    service: Arc<SuggestionService>,
    runtime: Handle,
    tx: UnboundedSender<SuggestionResult>,
    rx: UnboundedReceiver<SuggestionResult>,
}

impl std::fmt::Debug for SuggestionWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionWorker").field("service", &self.service).finish()
    }
}

impl SuggestionWorker {
    fn new(service: SuggestionService, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self { service: Arc::new(service), runtime, tx, rx }
    }

    fn spawn(&self, request: SuggestionRequest) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let command = service.suggest_command(&request.name, &request.path).await;
            // The receiver is gone only when the app has shut down
            let _ = tx.send(SuggestionResult { ticket: request.ticket, command });
        });
    }
}

impl App {
    /// Create the application over a loaded repository.
    ///
    /// Suggestion requests are spawned on `runtime`.
    pub fn new(
        config: &Config,
        repo: ShortcutRepository,
        suggestions: SuggestionService,
        runtime: Handle,
    ) -> Self {
        let output_dir = config
            .script
            .output_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut app = Self {
            input: String::new(),
            repo,
            filtered: Vec::new(),
            selected: 0,
            view_mode: config.ui.view_mode,
            search_mode: config.ui.search_mode,
            grid_columns: usize::from(config.ui.grid_columns.max(1)),
            mode: AppMode::Normal,
            editor: None,
            status_message: None,
            should_quit: false,
            theme: Theme::by_name(&config.ui.theme).unwrap_or_default(),
            output_dir,
            script_options: config.script_options(),
            suggestions: SuggestionWorker::new(suggestions, runtime),
        };
        app.update_filtered();
        app
    }

    /// Whether AI suggestions have a provider behind them.
    pub fn suggestions_configured(&self) -> bool {
        self.suggestions.service.is_configured()
    }

    // --- search ---

    /// Add a character to the search input.
    pub fn enter_char(&mut self, c: char) {
        self.input.push(c);
        self.update_filtered();
    }

    /// Delete the last search character.
    pub fn delete_char(&mut self) {
        self.input.pop();
        self.update_filtered();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.update_filtered();
    }

    /// Recompute the visible shortcuts and keep the selection in range.
    pub fn update_filtered(&mut self) {
        self.filtered = filter_shortcuts(self.repo.list(), &self.input, self.search_mode);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
    }

    /// Shortcuts currently visible, in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Shortcut> {
        let list = self.repo.list();
        self.filtered.iter().filter_map(move |&i| list.get(i))
    }

    pub fn selected_shortcut(&self) -> Option<&Shortcut> {
        self.filtered.get(self.selected).and_then(|&i| self.repo.list().get(i))
    }

    /// Whether the shortcut's directory exists on this machine.
    pub fn path_exists(shortcut: &Shortcut) -> bool {
        expand_path(Path::new(&shortcut.path)).is_dir()
    }

    // --- navigation ---

    fn row_step(&self) -> usize {
        match self.view_mode {
            ViewMode::Grid => self.grid_columns,
            ViewMode::List => 1,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.filtered.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move down one row (one card row in grid view).
    pub fn select_down(&mut self) {
        let target = self.selected + self.row_step();
        if target < self.filtered.len() {
            self.selected = target;
        }
    }

    /// Move up one row (one card row in grid view).
    pub fn select_up(&mut self) {
        self.selected = self.selected.checked_sub(self.row_step()).unwrap_or(self.selected);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    // --- status ---

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Periodic tick: pick up finished background work.
    pub fn tick(&mut self) {
        self.poll_suggestions();
    }

    // --- running ---

    /// Write the selected shortcut's launcher script.
    pub fn run_selected(&mut self) {
        let Some(shortcut) = self.selected_shortcut() else {
            return;
        };
        let name = shortcut.name.clone();

        match write_launcher(shortcut, &self.output_dir, &self.script_options) {
            Ok(path) => {
                self.set_status(format!("Launcher for {name} saved to {}", path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, shortcut = %name, "Failed to write launcher");
                self.set_status(format!("Could not save launcher: {e}"));
            }
        }
    }

    // --- editor ---

    pub fn open_new_editor(&mut self) {
        self.editor = Some(EditorForm::new(&self.repo));
        self.mode = AppMode::Editor;
    }

    pub fn open_edit_editor(&mut self) {
        if let Some(shortcut) = self.selected_shortcut() {
            self.editor = Some(EditorForm::edit(shortcut));
            self.mode = AppMode::Editor;
        }
    }

    /// Close the editor without saving. A pending suggestion is dropped when it arrives.
    pub fn close_editor(&mut self) {
        self.editor = None;
        self.mode = AppMode::Normal;
    }

    /// Save the open form.
    ///
    /// The editor stays open when the form is rejected. A record that was
    /// applied but not written to disk closes the form like a normal save.
    pub fn submit_editor(&mut self) {
        let Some(form) = self.editor.as_mut() else {
            return;
        };
        let editing = form.is_editing();
        let verb = if editing { "Updated" } else { "Created" };

        let saved = match form.submit(&mut self.repo) {
            Ok(saved) => {
                self.set_status(format!("{verb} {}", saved.name));
                saved
            }
            Err(SubmitError::Repository(RepositoryError::Storage { shortcut, source })) => {
                self.set_status(format!("{verb} {} but could not save: {source}", shortcut.name));
                *shortcut
            }
            Err(e) => {
                tracing::debug!(error = %e, "Editor submit rejected");
                return;
            }
        };

        self.close_editor();
        self.update_filtered();
        self.select_id(&saved.id);
    }

    /// Ask for a command suggestion for the open form.
    pub fn request_suggestion(&mut self) {
        let Some(form) = self.editor.as_mut() else {
            return;
        };
        if let Some(request) = form.begin_suggestion() {
            tracing::debug!(name = %request.name, "Requesting command suggestion");
            self.suggestions.spawn(request);
        }
    }

    /// Apply finished suggestions. Returns `true` if the open form changed.
    pub fn poll_suggestions(&mut self) -> bool {
        let mut applied = false;
        while let Ok(result) = self.suggestions.rx.try_recv() {
            let accepted = self
                .editor
                .as_mut()
                .is_some_and(|form| form.apply_suggestion(result.ticket, result.command.clone()));
            if accepted {
                applied = true;
            } else {
                tracing::debug!(command = %result.command, "Discarding stale suggestion");
            }
        }
        applied
    }

    // --- deletion ---

    /// Ask for confirmation before deleting the selected shortcut.
    pub fn request_delete(&mut self) {
        if let Some(shortcut) = self.selected_shortcut() {
            self.mode = AppMode::ConfirmDelete(shortcut.id.clone());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn confirm_delete(&mut self) {
        let AppMode::ConfirmDelete(id) = self.mode.clone() else {
            return;
        };
        self.mode = AppMode::Normal;
        match self.repo.delete(&id) {
            Ok(removed) => self.set_status(format!("Deleted {}", removed.name)),
            Err(RepositoryError::Storage { shortcut, source }) => {
                self.set_status(format!("Deleted {} but could not save: {source}", shortcut.name));
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "Failed to delete shortcut");
                self.set_status(format!("Delete failed: {e}"));
            }
        }
        self.update_filtered();
    }

    /// Name of the shortcut awaiting delete confirmation.
    pub fn pending_delete_name(&self) -> Option<&str> {
        match &self.mode {
            AppMode::ConfirmDelete(id) => self.repo.get(id).map(|s| s.name.as_str()),
            _ => None,
        }
    }

    // --- help ---

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    fn select_id(&mut self, id: &str) {
        let list = self.repo.list();
        if let Some(pos) = self.filtered.iter().position(|&i| list[i].id == id) {
            self.selected = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::{MemoryStore, ShortcutDraft, ShortcutStore, StubSuggester};

    fn repo() -> ShortcutRepository {
        let mut repo = ShortcutRepository::in_memory();
        for (name, port) in [("Alpha", "3000"), ("Beta", "3001"), ("Gamma", "4000"), ("Delta", "")] {
            repo.create(ShortcutDraft::new(name, format!("/srv/{name}"), "npm run dev").with_port(port))
                .unwrap();
        }
        repo
    }

    fn app_with(service: SuggestionService) -> App {
        App::new(&Config::default(), repo(), service, Handle::current())
    }

    async fn wait_for_suggestion(app: &mut App) -> bool {
        for _ in 0..100 {
            if app.poll_suggestions() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_search_filters_and_clamps_selection() {
        let mut app = app_with(SuggestionService::disabled());
        assert_eq!(app.filtered.len(), 4);

        app.select_last();
        assert_eq!(app.selected, 3);

        for c in "gam".chars() {
            app.enter_char(c);
        }
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_shortcut().unwrap().name, "Gamma");

        app.clear_input();
        assert_eq!(app.visible().count(), 4);
    }

    #[tokio::test]
    async fn test_grid_navigation_moves_by_row() {
        let mut app = app_with(SuggestionService::disabled());
        assert_eq!(app.view_mode, ViewMode::Grid);

        app.select_down();
        assert_eq!(app.selected, 3);
        app.select_down();
        assert_eq!(app.selected, 3);
        app.select_up();
        assert_eq!(app.selected, 0);

        app.toggle_view();
        app.select_down();
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_create_through_editor() {
        let mut app = app_with(SuggestionService::disabled());
        app.open_new_editor();
        assert_eq!(app.mode, AppMode::Editor);

        let form = app.editor.as_mut().unwrap();
        assert_eq!(form.port, "3002");
        form.name = "Epsilon".to_string();
        form.path = "/srv/epsilon".to_string();

        app.submit_editor();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.repo.len(), 5);
        assert_eq!(app.selected_shortcut().unwrap().name, "Epsilon");
        assert_eq!(app.status_message.as_deref(), Some("Created Epsilon"));
    }

    #[tokio::test]
    async fn test_editor_stays_open_on_conflict() {
        let mut app = app_with(SuggestionService::disabled());
        app.open_new_editor();
        let form = app.editor.as_mut().unwrap();
        form.name = "Clash".to_string();
        form.path = "/srv/clash".to_string();
        form.port = "4000".to_string();

        app.submit_editor();
        assert_eq!(app.mode, AppMode::Editor);
        assert!(app.editor.as_ref().unwrap().error.is_some());
        assert_eq!(app.repo.len(), 4);
    }

    #[tokio::test]
    async fn test_unsaved_create_closes_editor_once() {
        let backend = MemoryStore::new();
        let repo = ShortcutRepository::new(ShortcutStore::new(backend.clone()));
        let mut app =
            App::new(&Config::default(), repo, SuggestionService::disabled(), Handle::current());
        backend.set_read_only(true);

        app.open_new_editor();
        let form = app.editor.as_mut().unwrap();
        form.name = "Api".to_string();
        form.path = "/srv/api".to_string();
        app.submit_editor();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.editor.is_none());
        assert_eq!(app.repo.len(), 1);
        assert_eq!(app.selected_shortcut().unwrap().name, "Api");
        assert!(app.status_message.as_deref().unwrap().contains("could not save"));

        backend.set_read_only(false);
        app.submit_editor();
        assert_eq!(app.repo.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = app_with(SuggestionService::disabled());
        app.select_next();
        app.request_delete();
        assert_eq!(app.pending_delete_name(), Some("Beta"));

        app.cancel_delete();
        assert_eq!(app.repo.len(), 4);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.repo.len(), 3);
        assert!(app.repo.list().iter().all(|s| s.name != "Beta"));
    }

    #[tokio::test]
    async fn test_run_writes_launcher() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(SuggestionService::disabled());
        app.output_dir = dir.path().to_path_buf();

        app.run_selected();
        let written = dir.path().join("Alpha.command");
        assert!(written.exists());
        assert!(app.status_message.as_deref().unwrap().contains("Alpha.command"));
    }

    #[tokio::test]
    async fn test_suggestion_applies_to_open_form() {
        let service = SuggestionService::new(vec![Box::new(StubSuggester::ok("cargo run"))]);
        let mut app = app_with(service);
        app.open_new_editor();
        app.editor.as_mut().unwrap().name = "crate".to_string();

        app.request_suggestion();
        assert!(app.editor.as_ref().unwrap().is_suggestion_pending());
        assert!(wait_for_suggestion(&mut app).await);
        assert_eq!(app.editor.as_ref().unwrap().command, "cargo run");
    }

    #[tokio::test]
    async fn test_late_suggestion_is_discarded() {
        let slow = StubSuggester {
            reply: Ok("cargo run".to_string()),
            delay: Some(Duration::from_millis(20)),
        };
        let mut app = app_with(SuggestionService::new(vec![Box::new(slow)]));
        app.open_new_editor();
        app.editor.as_mut().unwrap().name = "crate".to_string();
        app.request_suggestion();

        // Close and reopen before the reply lands
        app.close_editor();
        app.open_new_editor();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!app.poll_suggestions());
        assert_eq!(app.editor.as_ref().unwrap().command, "npm run dev");
    }

    #[tokio::test]
    async fn test_failed_suggestion_falls_back() {
        let service = SuggestionService::new(vec![Box::new(StubSuggester::failing())]);
        let mut app = app_with(service);
        app.open_edit_editor();
        app.editor.as_mut().unwrap().command = "custom".to_string();

        app.request_suggestion();
        assert!(wait_for_suggestion(&mut app).await);
        assert_eq!(app.editor.as_ref().unwrap().command, "npm run dev");
    }
}
