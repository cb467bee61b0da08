//! LLM client
//!
//! Wraps a single configured provider behind the [`LanguageModel`] gateway:
//! assembles the context block, enforces the per-call timeout and logs every
//! call with its duration and a truncated preview of the answer.

use super::{
    build_prompt, ollama::OllamaProvider, openai::OpenAIProvider, GenerationOptions,
    LLMProvider, LanguageModel, Message, PromptContext,
};
use crate::config::LLMConfig;
use async_trait::async_trait;
use sdk::errors::{EngineError, GenerationError};
use std::time::{Duration, Instant};

/// Longest response prefix written to the log
const PREVIEW_CHARS: usize = 200;

/// Gateway over one provider
pub struct LlmClient {
    provider: Box<dyn LLMProvider>,
    timeout: Duration,
}

impl LlmClient {
    /// Create a client over an already-built provider
    pub fn new(provider: Box<dyn LLMProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Build the provider selected by `config.backend`
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` for an unknown backend or a missing
    /// OpenAI API key. This runs at startup, never mid-request.
    pub fn from_config(config: &LLMConfig) -> Result<Self, EngineError> {
        let backend = config
            .backend
            .split('#')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        let provider: Box<dyn LLMProvider> = match backend.as_str() {
            "openai" => {
                let api_key = config
                    .openai
                    .api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
                    .ok_or_else(|| {
                        EngineError::Config(
                            "OPENAI_API_KEY is required when llm.backend = 'openai'".to_string(),
                        )
                    })?;
                Box::new(OpenAIProvider::new(config.openai.clone(), api_key))
            }
            "ollama" => Box::new(OllamaProvider::new(
                config.ollama.base_url.clone(),
                config.ollama.model.clone(),
            )),
            _ => {
                return Err(EngineError::Config(format!(
                    "Unknown LLM backend '{}'",
                    config.backend
                )))
            }
        };

        tracing::info!("Initialized LLM client with backend {}", provider.name());

        Ok(Self::new(provider, Duration::from_secs(config.timeout_secs)))
    }

    /// Name of the underlying provider
    pub fn backend(&self) -> &str {
        self.provider.name()
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&PromptContext>,
        options: &GenerationOptions,
    ) -> super::Result<String> {
        let full_prompt = build_prompt(prompt, context);

        tracing::info!(
            backend = self.provider.name(),
            prompt_chars = full_prompt.chars().count(),
            max_tokens = ?options.max_tokens,
            temperature = ?options.temperature,
            "LLM generate start"
        );
        tracing::debug!("Full prompt: {}", full_prompt);

        let start = Instant::now();
        let messages = [Message::user(full_prompt)];

        let result = tokio::time::timeout(self.timeout, self.provider.complete(&messages, options))
            .await
            .unwrap_or(Err(GenerationError::Timeout));

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(text) => tracing::info!(
                backend = self.provider.name(),
                "LLM generate completed in {:.3}s, response={:?}",
                elapsed,
                preview(text)
            ),
            Err(e) => tracing::warn!(
                backend = self.provider.name(),
                "LLM generate failed after {:.3}s: {}",
                elapsed,
                e
            ),
        }

        result
    }
}

/// Truncate a response for logging, respecting char boundaries
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...(truncated)", head)
    }
}
