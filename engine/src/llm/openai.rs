//! OpenAI chat-completions provider

use super::{GenerationOptions, LLMProvider, Message};
use crate::config::OpenAIConfig;
use async_trait::async_trait;
use sdk::errors::GenerationError;
use serde_json::json;

pub struct OpenAIProvider {
    config: OpenAIConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig, api_key: impl Into<String>) -> Self {
        Self {
            config,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn payload(&self, messages: &[Message], options: &GenerationOptions) -> serde_json::Value {
        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.to_string(),
                    "content": msg.content
                })
            })
            .collect();

        let mut payload = json!({
            "model": self.config.model,
            "messages": api_messages,
        });

        if let Some(max_tokens) = options.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = options.temperature {
            payload["temperature"] = json!(temperature);
        }

        payload
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> super::Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.payload(messages, options))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::NetworkError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 | 403 => GenerationError::AuthenticationFailed(text),
                429 => GenerationError::RateLimitExceeded,
                500..=599 => GenerationError::ProviderUnavailable(format!(
                    "OpenAI API error ({}): {}",
                    status, text
                )),
                _ => GenerationError::InvalidRequest(text),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::ParseError(e.to_string()))?;

        let choice = data
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| GenerationError::ParseError("No choices in response".to_string()))?;

        choice
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| GenerationError::ParseError("Empty content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_properties() {
        let provider = OpenAIProvider::new(OpenAIConfig::default(), "sk-test");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_payload_includes_options_only_when_set() {
        let provider = OpenAIProvider::new(OpenAIConfig::default(), "sk-test");
        let messages = vec![Message::user("hello world")];

        let bare = provider.payload(&messages, &GenerationOptions::default());
        assert!(bare.get("max_tokens").is_none());
        assert!(bare.get("temperature").is_none());
        assert_eq!(bare["messages"][0]["role"], "user");
        assert_eq!(bare["messages"][0]["content"], "hello world");

        let tuned = provider.payload(
            &messages,
            &GenerationOptions::new().with_max_tokens(10).with_temperature(0.5),
        );
        assert_eq!(tuned["max_tokens"], 10);
        assert_eq!(tuned["temperature"], 0.5);
        assert_eq!(tuned["model"], "gpt-3.5-turbo");
    }
}
