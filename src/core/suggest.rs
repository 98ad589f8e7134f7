//! Run-command suggestions.
//!
//! `CommandSuggester` is the seam to an external text-generation service.
//! `SuggestionService` walks a chain of suggesters and always yields a
//! usable command: any failure, timeout, or empty reply falls back to the
//! configured default.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::DEFAULT_COMMAND;

/// An external service that proposes a shell command from a description.
#[async_trait]
pub trait CommandSuggester: Send + Sync {
    /// Return a suggested command for the free-text `prompt`.
    async fn suggest(&self, prompt: &str) -> anyhow::Result<String>;

    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;
}

/// Context line sent to the suggester for a project.
pub fn suggestion_context(name: &str, path: &str) -> String {
    format!("Project name: {}. Path: {}.", name.trim(), path.trim())
}

/// Full prompt for a project description.
pub fn build_prompt(context: &str) -> String {
    format!(
        r#"I am a developer setting up a shortcut for a local project.
Based on this description: "{context}", suggest a single terminal command to run the project.

Examples:
"NextJS app" -> "npm run dev"
"Python Flask" -> "python app.py"
"Docker compose" -> "docker-compose up"
"Rust project" -> "cargo run"

Return ONLY the command string, no markdown, no explanation."#
    )
}

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid fence regex"));

/// Reduce a model reply to a bare command.
///
/// Strips markdown fences and inline backticks, a leading `$ ` prompt, and
/// surrounding quotes, then keeps the first non-empty line. Returns `None`
/// when nothing is left.
pub fn sanitize_suggestion(reply: &str) -> Option<String> {
    let without_fences = FENCE_RE.replace_all(reply, "\n");

    without_fences
        .lines()
        .map(|line| {
            let line = line.trim().trim_matches('`').trim();
            let line = line.strip_prefix("$ ").unwrap_or(line);
            strip_wrapping_quotes(line.trim())
        })
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn strip_wrapping_quotes(line: &str) -> &str {
    for quote in ['"', '\''] {
        if line.len() >= 2 && line.starts_with(quote) && line.ends_with(quote) {
            let inner = &line[1..line.len() - 1];
            if !inner.contains(quote) {
                return inner;
            }
        }
    }
    line
}

/// Ordered chain of suggesters with a guaranteed fallback.
pub struct SuggestionService {
    providers: Vec<Box<dyn CommandSuggester>>,
    default_command: String,
    timeout: Duration,
}

impl std::fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("SuggestionService")
            .field("providers", &names)
            .field("default_command", &self.default_command)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SuggestionService {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SuggestionService {
    /// Create a service over `providers`, tried in order.
    pub fn new(providers: Vec<Box<dyn CommandSuggester>>) -> Self {
        Self {
            providers,
            default_command: DEFAULT_COMMAND.to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    /// A service with no providers; every request yields the default.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_default_command(mut self, command: impl Into<String>) -> Self {
        self.default_command = command.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether any provider is configured.
    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    /// Name of the first provider.
    pub fn active_provider(&self) -> Option<&str> {
        self.providers.first().map(|p| p.name())
    }

    /// Command used when no suggestion can be obtained.
    pub fn default_command(&self) -> &str {
        &self.default_command
    }

    /// Suggest a run command for a project. Never fails.
    pub async fn suggest_command(&self, name: &str, path: &str) -> String {
        let context = suggestion_context(name, path);
        self.suggest_for_context(&context).await
    }

    /// Suggest a run command for free-text `context`. Never fails.
    pub async fn suggest_for_context(&self, context: &str) -> String {
        if self.providers.is_empty() {
            tracing::warn!("No suggestion provider configured, using default command");
            return self.default_command.clone();
        }

        let prompt = build_prompt(context);
        for provider in &self.providers {
            match tokio::time::timeout(self.timeout, provider.suggest(&prompt)).await {
                Ok(Ok(reply)) => {
                    if let Some(command) = sanitize_suggestion(&reply) {
                        tracing::debug!(provider = provider.name(), %command, "Got suggestion");
                        return command;
                    }
                    tracing::warn!(provider = provider.name(), "Provider returned an empty suggestion");
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Provider failed, trying next");
                }
                Err(_) => {
                    tracing::warn!(
                        provider = provider.name(),
                        timeout_secs = self.timeout.as_secs(),
                        "Provider timed out, trying next"
                    );
                }
            }
        }

        self.default_command.clone()
    }
}
