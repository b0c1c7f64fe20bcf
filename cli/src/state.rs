//! Application state management

use std::path::Path;

use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::debug;
use vnreader_core::{AppStore, DataDir, ProviderKind, SentenceStore, Settings};
use vnreader_llm::{
    Assistant, ClaudeProvider, LlmError, LlmProvider, OllamaProvider, PromptContext,
};

/// Environment variable consulted when no key is stored in settings
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Loaded library plus where it lives
pub struct AppState {
    pub data_dir: DataDir,
    pub store: AppStore,
}

impl AppState {
    /// Load the library from `root`, or from the platform data directory
    pub fn open(root: Option<&Path>) -> Result<Self> {
        let data_dir = match root {
            Some(root) => DataDir::with_root(root),
            None => DataDir::new().context("Failed to resolve data directory")?,
        };
        let store = data_dir
            .load()
            .with_context(|| format!("Failed to load library from {}", data_dir.root().display()))?;
        debug!("Loaded {} sentences", store.sentences().len());
        Ok(Self { data_dir, store })
    }

    /// Persist pending changes
    pub fn save(&mut self) -> Result<()> {
        self.data_dir
            .save_if_dirty(&mut self.store)
            .with_context(|| format!("Failed to save library to {}", self.data_dir.root().display()))?;
        Ok(())
    }

    /// Backend selected in settings
    pub fn provider(&self) -> ConfiguredProvider {
        let env_key = std::env::var(API_KEY_ENV).ok();
        ConfiguredProvider::from_settings(self.store.settings(), env_key)
    }

    /// Sentence assistant over the configured backend
    pub fn assistant(&self) -> Assistant<ConfiguredProvider> {
        Assistant::new(self.provider(), prompt_context(self.store.settings()))
    }
}

/// Stored key first, then the environment
pub fn resolve_api_key(stored: &str, env_key: Option<String>) -> String {
    let stored = stored.trim();
    if stored.is_empty() {
        env_key.map(|k| k.trim().to_string()).unwrap_or_default()
    } else {
        stored.to_string()
    }
}

pub fn prompt_context(settings: &Settings) -> PromptContext {
    let work = settings.work_context.trim();
    PromptContext {
        translation_language: settings.translation_language.clone(),
        work_context: (!work.is_empty()).then(|| work.to_string()),
    }
}

/// Either LLM backend, chosen at runtime
pub enum ConfiguredProvider {
    Claude(ClaudeProvider),
    Ollama(OllamaProvider),
}

impl ConfiguredProvider {
    pub fn from_settings(settings: &Settings, env_key: Option<String>) -> Self {
        match settings.provider {
            ProviderKind::Claude => {
                let key = resolve_api_key(&settings.api_key, env_key);
                ConfiguredProvider::Claude(ClaudeProvider::with_model(
                    SecretString::new(key),
                    &settings.api_model,
                ))
            }
            ProviderKind::Ollama => ConfiguredProvider::Ollama(OllamaProvider::with_config(
                &settings.ollama_url,
                &settings.ollama_model,
            )),
        }
    }
}

impl LlmProvider for ConfiguredProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        match self {
            ConfiguredProvider::Claude(p) => p.complete(prompt).await,
            ConfiguredProvider::Ollama(p) => p.complete(prompt).await,
        }
    }

    async fn is_available(&self) -> bool {
        match self {
            ConfiguredProvider::Claude(p) => p.is_available().await,
            ConfiguredProvider::Ollama(p) => p.is_available().await,
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            ConfiguredProvider::Claude(p) => p.is_configured(),
            ConfiguredProvider::Ollama(p) => p.is_configured(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConfiguredProvider::Claude(p) => p.name(),
            ConfiguredProvider::Ollama(p) => p.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            ConfiguredProvider::Claude(p) => p.model(),
            ConfiguredProvider::Ollama(p) => p.model(),
        }
    }
}
