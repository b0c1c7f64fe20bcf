//! Claude API provider

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::provider::LlmProvider;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Claude API provider
pub struct ClaudeProvider {
    client: Client,
    api_key: SecretString,
    model: String,
}

impl ClaudeProvider {
    /// Create new Claude provider
    pub fn new(api_key: SecretString) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL)
    }

    /// Create with custom model
    pub fn with_model(api_key: SecretString, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.to_string(),
        }
    }

    fn request<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> ClaudeRequest<'a> {
        ClaudeRequest {
            model: &self.model,
            max_tokens,
            messages: vec![ClaudeMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    /// Send message to Claude API
    async fn send_message(&self, prompt: &str) -> Result<String, LlmError> {
        if !self.is_configured() {
            return Err(LlmError::ApiKeyMissing);
        }

        debug!("Sending request to Claude API (model: {})", self.model);

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&self.request(prompt, MAX_TOKENS))
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ClaudeErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            warn!("Claude API error: {} - {}", status, message);
            return Err(LlmError::RequestFailed(format!("{}: {}", status, message)));
        }

        let response: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        response
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or(LlmError::EmptyResponse)
    }
}

impl LlmProvider for ClaudeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_message(prompt).await
    }

    async fn is_available(&self) -> bool {
        if !self.is_configured() {
            return false;
        }

        self.client
            .post(CLAUDE_API_URL)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&self.request("Hello", 10))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    fn name(&self) -> &'static str {
        "Claude"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ClaudeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ClaudeMessage<'a>>,
}

#[derive(Serialize)]
struct ClaudeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
}

#[derive(Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ClaudeErrorResponse {
    error: ClaudeErrorBody,
}

#[derive(Deserialize)]
struct ClaudeErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let provider = ClaudeProvider::new(SecretString::new("key".to_string()));
        let json = serde_json::to_value(provider.request("こんにちは", MAX_TOKENS)).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "こんにちは");
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let provider = ClaudeProvider::new(SecretString::new("  ".to_string()));
        assert!(!provider.is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let provider = ClaudeProvider::new(SecretString::new(String::new()));
        let err = provider.complete("hi").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiKeyMissing));
    }
}
