//! Claude API integration.
//!
//! Implements the CommandSuggester trait for Claude.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AIError;
use crate::core::CommandSuggester;

/// Claude API provider.
pub struct ClaudeProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    /// Create a new Claude provider.
    ///
    /// Reads API key from ANTHROPIC_API_KEY environment variable.
    pub fn new() -> anyhow::Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AIError::ProviderNotAvailable("ANTHROPIC_API_KEY not set".into()))?;

        Ok(Self { client: Client::new(), api_key, model: "claude-sonnet-4-20250514".to_string() })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Make a request to the Claude API.
    async fn request(&self, user_message: &str) -> anyhow::Result<String> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 128,
            system: "You suggest shell commands. Output only the command.".to_string(),
            messages: vec![Message { role: "user".to_string(), content: user_message.to_string() }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AIError::ApiError(format!("{status}: {body}")).into());
        }

        let response: ClaudeResponse = response.json().await?;

        response.content.into_iter().next().map(|c| c.text).ok_or_else(|| AIError::NoResponse.into())
    }
}

#[async_trait]
impl CommandSuggester for ClaudeProvider {
    async fn suggest(&self, prompt: &str) -> anyhow::Result<String> {
        self.request(prompt).await
    }

    fn name(&self) -> &str {
        "claude"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Claude API request structure.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

/// Message in a Claude request.
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Claude API response structure.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

/// Content block in a Claude response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}
