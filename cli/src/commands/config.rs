//! Settings commands

use anyhow::{bail, Result};
use vnreader_core::ProviderKind;
use vnreader_llm::{LlmProvider, OllamaProvider};

use crate::cli::Provider;
use crate::state::AppState;

pub async fn show(state: &AppState) {
    let settings = state.store.settings();
    let provider = state.provider();

    println!("data dir:    {}", state.data_dir.root().display());
    println!("provider:    {} ({})", provider.name(), provider.model());
    println!("api key:     {}", mask(&settings.api_key));
    println!("ollama url:  {}", settings.ollama_url);
    println!("language:    {}", settings.translation_language);
    if !settings.work_context.is_empty() {
        println!("work:        {}", settings.work_context);
    }
    println!(
        "status:      {}",
        if !provider.is_configured() {
            "no API key"
        } else if provider.is_available().await {
            "available"
        } else {
            "unreachable"
        }
    );
}

pub fn set_key(state: &mut AppState, key: &str) -> Result<()> {
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    state.store.update_settings(|s| s.api_key = key);
    state.save()?;
    println!("API key saved");
    Ok(())
}

pub fn set_model(state: &mut AppState, model: &str) -> Result<()> {
    let model = model.trim().to_string();
    if model.is_empty() {
        bail!("Model must not be empty");
    }
    state.store.update_settings(|s| match s.provider {
        ProviderKind::Claude => s.api_model = model,
        ProviderKind::Ollama => s.ollama_model = model,
    });
    state.save()?;
    println!("Model set to {}", state.provider().model());
    Ok(())
}

pub fn set_provider(state: &mut AppState, provider: Provider) -> Result<()> {
    let kind = match provider {
        Provider::Claude => ProviderKind::Claude,
        Provider::Ollama => ProviderKind::Ollama,
    };
    state.store.update_settings(|s| s.provider = kind);
    state.save()?;
    println!("Provider set to {}", state.provider().name());
    Ok(())
}

pub fn set_context(state: &mut AppState, language: &str, work: Option<String>) -> Result<()> {
    let language = language.trim().to_string();
    if language.is_empty() {
        bail!("Language must not be empty");
    }
    state.store.update_settings(|s| {
        s.translation_language = language;
        if let Some(work) = work {
            s.work_context = work.trim().to_string();
        }
    });
    state.save()?;
    println!("Prompt context updated");
    Ok(())
}

pub async fn models(state: &AppState) -> Result<()> {
    let settings = state.store.settings();
    let ollama = OllamaProvider::with_config(&settings.ollama_url, &settings.ollama_model);
    for model in ollama.list_models().await? {
        println!("{model}");
    }
    Ok(())
}

fn mask(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_all_but_tail() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("sk-ant-abcdef1234"), "****1234");
        assert_eq!(mask("ab"), "****ab");
    }
}
