//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::AppMode;
use crate::editor::EditorField;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(key, app),
        AppMode::Editor => handle_editor_mode(key, app),
        AppMode::ConfirmDelete(_) => handle_confirm_delete_mode(key, app),
        AppMode::Help => handle_help_mode(key, app),
    }
}

/// Handle input in help mode.
fn handle_help_mode(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
        app.dismiss_help();
    }
}

/// Handle input while a delete is awaiting confirmation.
fn handle_confirm_delete_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

/// Handle input on the dashboard.
fn handle_normal_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Esc clears the search first, then quits
        KeyCode::Esc => {
            if app.input.is_empty() {
                app.quit();
            } else {
                app.clear_input();
            }
        }

        KeyCode::Char('n') if ctrl => app.open_new_editor(),
        KeyCode::Char('e') if ctrl => app.open_edit_editor(),
        KeyCode::Char('d') if ctrl => app.request_delete(),
        KeyCode::Char('v') if ctrl => app.toggle_view(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Tab => app.toggle_view(),
        KeyCode::Char('?') if app.input.is_empty() => app.show_help(),

        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::Left => app.select_previous(),
        KeyCode::Right => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.run_selected(),

        KeyCode::Backspace => {
            app.clear_status();
            app.delete_char();
        }
        KeyCode::Char(c) if !ctrl => {
            app.clear_status();
            app.enter_char(c);
        }
        _ => {}
    }
}

/// Handle input while the editor form is open.
fn handle_editor_mode(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Enter => app.submit_editor(),
        KeyCode::Char('g') if ctrl => app.request_suggestion(),
        KeyCode::Char('p') if ctrl => {
            if let Some(form) = app.editor.as_mut() {
                form.fill_suggested_port(&app.repo);
            }
        }
        KeyCode::Char('o') if ctrl => {
            if let Some(form) = app.editor.as_mut() {
                if let Err(e) = form.load_icon_file() {
                    tracing::debug!(error = %e, "Icon file rejected");
                }
            }
        }
        _ => {
            let Some(form) = app.editor.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Left if form.focus == EditorField::Icon => form.cycle_icon(false),
                KeyCode::Right if form.focus == EditorField::Icon => form.cycle_icon(true),
                KeyCode::Char('u') if ctrl => form.clear_field(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !ctrl => form.insert_char(c),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ShortcutDraft, ShortcutRepository, SuggestionService};
    use crate::core::{Icon, IconName};

    fn press(app: &mut App, code: KeyCode) {
        handle_events(KeyEvent::new(code, KeyModifiers::NONE), app);
    }

    fn ctrl(app: &mut App, c: char) {
        handle_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), app);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        let mut repo = ShortcutRepository::in_memory();
        repo.create(ShortcutDraft::new("Web", "/srv/web", "npm run dev").with_port("3000")).unwrap();
        repo.create(ShortcutDraft::new("Api", "/srv/api", "cargo run")).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        App::new(&Config::default(), repo, SuggestionService::disabled(), runtime.handle().clone())
    }

    #[test]
    fn test_typing_searches() {
        let mut app = app();
        type_text(&mut app, "api");
        assert_eq!(app.input, "api");
        assert_eq!(app.filtered.len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(app.input.is_empty());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_editor_flow() {
        let mut app = app();
        ctrl(&mut app, 'n');
        assert_eq!(app.mode, AppMode::Editor);

        type_text(&mut app, "Docs");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "/srv/docs");

        // Shift+Tab from Name wraps past the icon file to the icon picker
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.editor.as_ref().unwrap().focus, EditorField::Icon);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.editor.as_ref().unwrap().icon, Icon::Symbolic(IconName::Code));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.repo.len(), 3);
        let docs = app.repo.find("Docs").unwrap();
        assert_eq!(docs.port.as_deref(), Some("3001"));
    }

    #[test]
    fn test_editor_escape_discards() {
        let mut app = app();
        ctrl(&mut app, 'e');
        type_text(&mut app, "zzz");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.repo.list()[0].name, "Web");
    }

    #[test]
    fn test_delete_confirmation_keys() {
        let mut app = app();
        ctrl(&mut app, 'd');
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.repo.len(), 2);

        ctrl(&mut app, 'd');
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.repo.len(), 1);
        assert_eq!(app.repo.list()[0].name, "Api");
    }

    #[test]
    fn test_view_toggle() {
        let mut app = app();
        let initial = app.view_mode;
        press(&mut app, KeyCode::Tab);
        assert_ne!(app.view_mode, initial);
        ctrl(&mut app, 'v');
        assert_eq!(app.view_mode, initial);
    }

    #[test]
    fn test_ctrl_c_quits_from_editor() {
        let mut app = app();
        ctrl(&mut app, 'n');
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }
}
