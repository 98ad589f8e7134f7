//! Gemini API integration.
//!
//! Implements the CommandSuggester trait for Google's Gemini models.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AIError;
use crate::core::CommandSuggester;

/// Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Reads the key from GEMINI_API_KEY, falling back to API_KEY.
    pub fn new() -> anyhow::Result<Self> {
        let api_key = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|k| !k.trim().is_empty())
            .ok_or_else(|| AIError::ProviderNotAvailable("GEMINI_API_KEY not set".into()))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn request(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GeminiRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AIError::ApiError(format!("{status}: {body}")).into());
        }

        let response: GeminiResponse = response.json().await?;
        response.first_text().ok_or_else(|| AIError::NoResponse.into())
    }
}

#[async_trait]
impl CommandSuggester for GeminiProvider {
    async fn suggest(&self, prompt: &str) -> anyhow::Result<String> {
        self.request(prompt).await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
    }
}
