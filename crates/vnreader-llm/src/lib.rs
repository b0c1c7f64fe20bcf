//! LLM integration for vnreader
//!
//! This module provides Claude API and Ollama backends and the sentence
//! operations (reading, translation, explanation, verification) built on them.

pub mod assistant;
pub mod claude;
pub mod error;
pub mod ollama;
pub mod parse;
pub mod prompts;
pub mod provider;

pub use assistant::Assistant;
pub use claude::ClaudeProvider;
pub use error::LlmError;
pub use ollama::OllamaProvider;
pub use provider::{LlmProvider, PromptContext, ReadingAssistant, SentenceRequest, Verification};
