//! Telegram Bot API client
//!
//! Inbound updates arrive through the webhook; this module only carries the
//! update types and the outbound `sendMessage` call.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Telegram rejects messages longer than 4096 characters
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Deserialize, Debug, Default)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
}

impl Update {
    /// The new or edited message carried by this update
    pub fn into_message(self) -> Option<Message> {
        self.message.or(self.edited_message)
    }
}

#[derive(Deserialize, Debug)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<serde_json::Value>,
    #[serde(default)]
    pub audio: Option<serde_json::Value>,
}

impl Message {
    pub fn is_audio(&self) -> bool {
        self.voice.is_some() || self.audio.is_some()
    }
}

#[derive(Deserialize, Debug)]
pub struct Chat {
    pub id: i64,
}

/// Outbound Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    token: String,
    api_url: String,
    client: Client,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(token: String, api_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            token,
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);

        #[derive(Serialize)]
        struct SendMsgReq<'a> {
            chat_id: i64,
            text: &'a str,
        }

        let text = truncate_reply(text);
        let req = SendMsgReq {
            chat_id,
            text: &text,
        };

        let response = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to reach Telegram")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("sendMessage to chat {} returned {}: {}", chat_id, status, body);
            anyhow::bail!("Telegram sendMessage failed with status {}", status);
        }

        debug!("Sent {} chars to chat {}", text.chars().count(), chat_id);
        Ok(())
    }
}

/// Cut replies that Telegram would reject
pub fn truncate_reply(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let head: String = text.chars().take(MAX_MESSAGE_CHARS).collect();
    format!("{}...\n\n(truncated)", head)
}
