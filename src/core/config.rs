//! Configuration management for DevDeck.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::script::ScriptOptions;
use super::SearchMode;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// UI/TUI settings
    pub ui: UiConfig,

    /// Launcher script settings
    pub script: ScriptConfig,

    /// AI command suggestion settings
    pub ai: AiConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Where shortcuts are stored (defaults to the platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Seed a demo shortcut on first use
    pub seed_demo: bool,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: default, dracula, nord)
    pub theme: String,

    /// Initial view mode
    pub view_mode: ViewMode,

    /// How the search box matches
    pub search_mode: SearchMode,

    /// Number of card columns in grid view
    pub grid_columns: u16,
}

/// Grid of cards or a compact list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

/// Launcher script settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Interpreter line
    pub shebang: String,

    /// Program used to open the browser (`open` on macOS, `xdg-open` on Linux)
    pub opener: String,

    /// Directory launchers are written to (defaults to the current directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

/// AI command suggestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether AI suggestions are enabled
    pub enabled: bool,

    /// Providers to try, in order (claude, gemini, ollama)
    pub providers: Vec<String>,

    /// Model override for the hosted providers (claude, gemini)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Command used when no suggestion is available
    pub default_command: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Ollama-specific settings
    pub ollama: OllamaConfig,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama server URL
    pub base_url: String,

    /// Model to use
    pub model: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.devdeck.toml` in current directory
    /// 2. `~/.config/devdeck/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".devdeck.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_file() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_file()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("devdeck"))
    }

    /// Path of the global config file.
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the default data directory path (for saved shortcuts and logs).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("devdeck"))
    }

    /// Data directory after applying the config override.
    pub fn resolved_data_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.general.data_dir {
            return Ok(expand_path(dir));
        }
        Self::data_dir().ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    /// Script options from the `[script]` section.
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions { shebang: self.script.shebang.clone(), opener: self.script.opener.clone() }
    }
}

/// Expand `~` and environment variables in a configured path.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { data_dir: None, seed_demo: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            view_mode: ViewMode::Grid,
            search_mode: SearchMode::Substring,
            grid_columns: 3,
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        let defaults = ScriptOptions::default();
        Self { shebang: defaults.shebang, opener: defaults.opener, output_dir: None }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            providers: vec!["claude".to_string(), "gemini".to_string(), "ollama".to_string()],
            model: None,
            default_command: super::DEFAULT_COMMAND.to_string(),
            timeout_secs: 20,
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: "llama3.2".to_string() }
    }
}
