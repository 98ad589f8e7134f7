//! Core types and functionality for DevDeck.
//!
//! This module contains the fundamental pieces used throughout the
//! application: the shortcut record, its repository and storage, launcher
//! script generation, search, command suggestions, and configuration.

mod config;
mod error;
mod filter;
mod repository;
mod script;
mod shortcut;
mod store;
mod suggest;

pub use config::{
    expand_path, AiConfig, Config, GeneralConfig, OllamaConfig, ScriptConfig, UiConfig, ViewMode,
};
pub use error::{Field, IconError, RepositoryError, StoreError, ValidationError};
pub use filter::{filter_shortcuts, matches_substring, SearchMode};
pub use repository::{ShortcutRepository, FIRST_SUGGESTED_PORT};
pub use script::{
    generate_script, generate_script_with, script_file_name, write_launcher, LauncherScript,
    ScriptOptions, SCRIPT_CONTENT_TYPE, SCRIPT_EXTENSION,
};
pub use shortcut::{
    Category, Icon, IconName, Shortcut, ShortcutDraft, ShortcutPatch, DEFAULT_COMMAND,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, ShortcutStore, STORAGE_KEY};
pub use suggest::{
    build_prompt, sanitize_suggestion, suggestion_context, CommandSuggester, SuggestionService,
};

#[cfg(test)]
pub(crate) use suggest::tests::StubSuggester;
