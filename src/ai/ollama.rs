//! Ollama local LLM integration.
//!
//! Implements the CommandSuggester trait for Ollama (local LLM).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AIError;
use crate::core::CommandSuggester;

/// Ollama API provider for local LLM.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses localhost:11434 unless OLLAMA_HOST is set.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: std::env::var("OLLAMA_HOST")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
        }
    }

    /// Create with a specific base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Make a request to the Ollama API.
    async fn request(&self, prompt: &str) -> anyhow::Result<String> {
        let request =
            OllamaRequest { model: self.model.clone(), prompt: prompt.to_string(), stream: false };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AIError::ApiError(format!("Ollama {status}: {body}")).into());
        }

        let response: OllamaResponse = response.json().await?;
        Ok(response.response)
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandSuggester for OllamaProvider {
    async fn suggest(&self, prompt: &str) -> anyhow::Result<String> {
        self.request(prompt).await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .is_ok()
    }
}

/// Ollama API request structure.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_ollama_with_custom_url() {
        let provider = OllamaProvider::new().with_base_url("http://custom:8080/");
        assert_eq!(provider.base_url, "http://custom:8080");
    }

    #[test]
    fn test_ollama_with_custom_model() {
        let provider = OllamaProvider::new().with_model("codellama");
        assert_eq!(provider.model, "codellama");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let provider = OllamaProvider::new().with_base_url("http://127.0.0.1:9");
        assert!(!provider.is_available().await);
    }
}
