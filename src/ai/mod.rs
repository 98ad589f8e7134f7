//! AI integration module.
//!
//! Concrete `CommandSuggester` providers that turn a project description
//! into a run command: Claude, Gemini, or a local Ollama model.

mod claude;
mod gemini;
mod ollama;

use std::time::Duration;

pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::core::{AiConfig, CommandSuggester, SuggestionService};

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("No response from AI")]
    NoResponse,
}

/// Instantiate one provider by name, `None` when it is unknown or not configured.
pub fn provider_by_name(name: &str, config: &AiConfig) -> Option<Box<dyn CommandSuggester>> {
    match name.trim().to_lowercase().as_str() {
        "claude" => {
            let provider = ClaudeProvider::new().ok()?;
            Some(match &config.model {
                Some(model) => Box::new(provider.with_model(model)),
                None => Box::new(provider),
            })
        }
        "gemini" => {
            let provider = GeminiProvider::new().ok()?;
            Some(match &config.model {
                Some(model) => Box::new(provider.with_model(model)),
                None => Box::new(provider),
            })
        }
        "ollama" => Some(Box::new(
            OllamaProvider::new()
                .with_base_url(&config.ollama.base_url)
                .with_model(&config.ollama.model),
        )),
        other => {
            tracing::warn!(provider = other, "Unknown AI provider in config");
            None
        }
    }
}

/// Build the suggestion service from config, keeping only providers that are available.
pub async fn build_service(config: &AiConfig) -> SuggestionService {
    let mut providers: Vec<Box<dyn CommandSuggester>> = Vec::new();

    if config.enabled {
        for name in &config.providers {
            if let Some(provider) = provider_by_name(name, config) {
                if provider.is_available().await {
                    providers.push(provider);
                } else {
                    tracing::debug!(provider = name.as_str(), "Provider not available");
                }
            }
        }
    }

    SuggestionService::new(providers)
        .with_default_command(&config.default_command)
        .with_timeout(Duration::from_secs(config.timeout_secs.max(1)))
}
