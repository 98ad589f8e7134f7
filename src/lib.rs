//! # DevDeck
//!
//! A dashboard of shortcuts to your local development projects.
//!
//! Each shortcut records where a project lives, the command that starts it,
//! and optionally the local port it serves on. DevDeck turns a shortcut into
//! a launcher script that opens the browser, enters the directory and runs
//! the command.
//!
//! ## Features
//!
//! - **Shortcut repository**: create, edit and delete shortcuts, persisted as JSON
//! - **Port hints**: suggests the next free port and warns about duplicates
//! - **Launcher scripts**: one double-clickable `.command` file per project
//! - **AI suggestions**: proposes a run command from the project name and path (optional)
//! - **Terminal dashboard**: searchable grid or list view
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the dashboard
//! devdeck
//!
//! # Or work from the command line
//! devdeck add --name "Blog" --path ~/projects/blog --port 4000
//! devdeck script Blog --output ~/Desktop
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::use_self)]

pub mod app;
pub mod core;
pub mod editor;
pub mod tui;

#[cfg(feature = "ai")]
pub mod ai;

#[cfg(feature = "ai")]
pub use ai::{AIError, ClaudeProvider, GeminiProvider, OllamaProvider};

// Re-export commonly used types
pub use app::App;
pub use core::{
    Config, Shortcut, ShortcutDraft, ShortcutPatch, ShortcutRepository, ShortcutStore,
    SuggestionService,
};
pub use editor::EditorForm;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "devdeck";

/// Suggestion service for the configured AI providers.
///
/// Without the `ai` feature every request yields the configured default command.
pub async fn suggestion_service(config: &core::AiConfig) -> SuggestionService {
    #[cfg(feature = "ai")]
    {
        ai::build_service(config).await
    }

    #[cfg(not(feature = "ai"))]
    {
        SuggestionService::disabled().with_default_command(&config.default_command)
    }
}
