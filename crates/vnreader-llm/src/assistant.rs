//! Sentence operations on top of a completion backend

use tracing::{debug, info};

use crate::error::LlmError;
use crate::parse;
use crate::prompts;
use crate::provider::{LlmProvider, PromptContext, ReadingAssistant, SentenceRequest, Verification};

/// Prompt building and output cleanup around an [`LlmProvider`]
pub struct Assistant<P> {
    provider: P,
    context: PromptContext,
}

impl<P: LlmProvider> Assistant<P> {
    pub fn new(provider: P, context: PromptContext) -> Self {
        Self { provider, context }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn context(&self) -> &PromptContext {
        &self.context
    }

    async fn ask(&self, prompt: String) -> Result<String, LlmError> {
        debug!("Prompt length: {} chars", prompt.len());
        self.provider.complete(&prompt).await
    }
}

fn non_empty(text: String) -> Result<String, LlmError> {
    if text.is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text)
    }
}

impl<P: LlmProvider + Sync> ReadingAssistant for Assistant<P> {
    async fn generate_reading(&self, request: &SentenceRequest) -> Result<String, LlmError> {
        info!("Generating reading with {} ({})", self.provider.name(), self.provider.model());
        let response = self
            .ask(prompts::build_reading_prompt(request, &self.context))
            .await?;
        non_empty(parse::clean_reading(&response))
    }

    async fn generate_meaning(&self, request: &SentenceRequest) -> Result<String, LlmError> {
        info!("Generating translation with {} ({})", self.provider.name(), self.provider.model());
        let response = self
            .ask(prompts::build_meaning_prompt(request, &self.context))
            .await?;
        non_empty(parse::clean_text(&response))
    }

    async fn generate_explanation(&self, request: &SentenceRequest) -> Result<String, LlmError> {
        info!("Generating explanation with {} ({})", self.provider.name(), self.provider.model());
        let response = self
            .ask(prompts::build_explanation_prompt(request, &self.context))
            .await?;
        non_empty(parse::clean_text(&response))
    }

    async fn verify_reading(
        &self,
        request: &SentenceRequest,
        existing_reading: &str,
    ) -> Result<Verification, LlmError> {
        info!("Verifying reading with {} ({})", self.provider.name(), self.provider.model());
        let response = self
            .ask(prompts::build_verification_prompt(request, existing_reading, &self.context))
            .await?;
        Ok(parse::parse_verification(&response))
    }

    fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider {
        answer: String,
    }

    impl LlmProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.answer.clone())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn is_configured(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "Canned"
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn assistant(answer: &str) -> Assistant<CannedProvider> {
        Assistant::new(
            CannedProvider {
                answer: answer.to_string(),
            },
            PromptContext::default(),
        )
    }

    #[tokio::test]
    async fn test_reading_is_cleaned() {
        let request = SentenceRequest::new("今日は", vec![]);
        let reading = assistant(" 今日(きょう)は \n").generate_reading(&request).await.unwrap();
        assert_eq!(reading, "今日[きょう]は");
    }

    #[tokio::test]
    async fn test_blank_answer_is_empty_response() {
        let request = SentenceRequest::new("今日は", vec![]);
        let err = assistant("   ").generate_meaning(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_verify_parses_answer() {
        let request = SentenceRequest::new("今日は", vec![]);
        let verification = assistant("RESULT: NG\nCORRECTION: 今日[きょう]は")
            .verify_reading(&request, "今日[こんにち]は")
            .await
            .unwrap();
        assert!(!verification.is_correct);
        assert_eq!(verification.corrected_reading.as_deref(), Some("今日[きょう]は"));
    }
}
