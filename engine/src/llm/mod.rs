//! Language-model gateway
//!
//! This module provides the narrow interface the orchestrator and the
//! specialist agents use to talk to a language model. [`LanguageModel`] is the
//! gateway contract: a prompt, an optional context block and a few sampling
//! hints in, text out. [`LLMProvider`] is the lower HTTP-facing layer
//! implemented by each backend (OpenAI, Ollama); [`client::LlmClient`] glues a
//! provider to the gateway contract and adds timeouts and logging.

use async_trait::async_trait;
use sdk::errors::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod client;
pub mod ollama;
pub mod openai;

pub use client::LlmClient;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Separator placed between context lines and between context and prompt
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Message sent to a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[cfg(test)]
impl Message {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

/// Sampling hints passed through to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Upper bound on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Randomness hint (0.0 = deterministic)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Context placed ahead of the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptContext {
    /// A single pre-formatted block
    Text(String),

    /// Logically distinct lines (system prompt, history entries)
    Lines(Vec<String>),
}

impl PromptContext {
    /// Render the context block, or `None` when there is nothing to send
    ///
    /// Text is trimmed. Lines are each trimmed and joined with a blank line.
    pub fn block(&self) -> Option<String> {
        let block = match self {
            PromptContext::Text(text) => text.trim().to_string(),
            PromptContext::Lines(lines) => lines
                .iter()
                .map(|line| line.trim())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR),
        };

        if block.trim().is_empty() {
            None
        } else {
            Some(block)
        }
    }
}

/// Build the full prompt sent to the provider
pub fn build_prompt(prompt: &str, context: Option<&PromptContext>) -> String {
    match context.and_then(PromptContext::block) {
        Some(block) => format!("{}{}{}", block, CONTEXT_SEPARATOR, prompt),
        None => prompt.to_string(),
    }
}

/// Gateway contract used by the orchestrator and the agents
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for `prompt`, preceded by `context` if given
    async fn generate(
        &self,
        prompt: &str,
        context: Option<&PromptContext>,
        options: &GenerationOptions,
    ) -> Result<String>;
}

/// LLM Provider trait that all HTTP backends must implement
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the name of the provider (e.g., "ollama", "openai")
    fn name(&self) -> &str;

    /// Send the messages and return the assistant text
    async fn complete(&self, messages: &[Message], options: &GenerationOptions)
        -> Result<String>;
}
