//! LLM provider traits and common types

use serde::{Deserialize, Serialize};
use vnreader_core::DictionaryHint;

use crate::error::LlmError;

/// A sentence handed to the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceRequest {
    /// Original text
    pub expression: String,
    /// Known word → reading pairs occurring in the sentence
    pub hints: Vec<DictionaryHint>,
}

impl SentenceRequest {
    pub fn new(expression: impl Into<String>, hints: Vec<DictionaryHint>) -> Self {
        Self {
            expression: expression.into(),
            hints,
        }
    }
}

/// Outcome of checking an existing reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub is_correct: bool,
    /// Suggested reading when the model found an error
    pub corrected_reading: Option<String>,
    /// Raw model explanation
    pub details: String,
}

/// Settings shared by every prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContext {
    /// Target language for translations and explanations
    pub translation_language: String,
    /// Description of the work being read (title, setting)
    pub work_context: Option<String>,
}

impl Default for PromptContext {
    fn default() -> Self {
        Self {
            translation_language: "Korean".to_string(),
            work_context: None,
        }
    }
}

/// Raw text-completion backend
#[trait_variant::make(LlmProvider: Send)]
pub trait LocalLlmProvider {
    /// Send a single-turn prompt and return the model's text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;

    /// Whether credentials required by the backend are present
    fn is_configured(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Get model name
    fn model(&self) -> &str;
}

/// The AI operations the reader needs
#[trait_variant::make(ReadingAssistant: Send)]
pub trait LocalReadingAssistant {
    /// Annotated reading for the expression, e.g. `食[た]べる`
    async fn generate_reading(&self, request: &SentenceRequest) -> Result<String, LlmError>;

    /// Translation into the configured language
    async fn generate_meaning(&self, request: &SentenceRequest) -> Result<String, LlmError>;

    /// Learner-oriented explanation
    async fn generate_explanation(&self, request: &SentenceRequest) -> Result<String, LlmError>;

    /// Check an existing annotated reading
    async fn verify_reading(
        &self,
        request: &SentenceRequest,
        existing_reading: &str,
    ) -> Result<Verification, LlmError>;

    /// Whether a credential is configured; checked once before a batch
    fn is_configured(&self) -> bool;
}
