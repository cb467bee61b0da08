//! Conversation Memory
//!
//! Bounded, per-conversation log of rendered exchanges. Every conversation
//! keeps at most `2 * turns` lines; appending past the cap drops the oldest
//! lines first. The backing [`HistoryStore`] is the only authority: there is
//! no cache in front of it, so every handler of a conversation sees the same
//! buffer.
//!
//! Memory is best-effort. A failed read degrades to an empty history and a
//! failed write is logged; neither is ever surfaced to the user.

use anyhow::Result;
use async_trait::async_trait;
use sdk::errors::StoreError;
use sdk::types::{Exchange, Speaker};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::db::Database;

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Shared keyed store of ordered history lines
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `entry` at the tail of `key` and keep only the newest `cap`
    /// entries. Must be atomic with respect to other writers of `key`.
    async fn push_and_trim(&self, key: &str, entry: String, cap: usize)
        -> Result<(), StoreError>;

    /// Read every entry stored under `key`, oldest first
    async fn range(&self, key: &str) -> Result<Vec<String>, StoreError>;
}

/// Per-conversation history window over a [`HistoryStore`]
#[derive(Clone)]
pub struct ConversationMemory {
    store: Arc<dyn HistoryStore>,
    cap: usize,
    key_prefix: String,
}

impl ConversationMemory {
    /// Create a memory keeping `turns` user+bot pairs per conversation
    pub fn new(store: Arc<dyn HistoryStore>, turns: usize, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            cap: turns * 2,
            key_prefix: key_prefix.into(),
        }
    }

    /// Maximum number of lines kept per conversation
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Store key for a conversation
    pub fn key(&self, conversation_id: &str) -> String {
        format!("{}{}", self.key_prefix, conversation_id)
    }

    /// Append one exchange and trim the buffer to the cap
    pub async fn append(
        &self,
        conversation_id: &str,
        speaker: Speaker,
        text: &str,
    ) -> Result<(), StoreError> {
        let entry = Exchange {
            speaker,
            text: text.to_string(),
        }
        .render();

        self.store
            .push_and_trim(&self.key(conversation_id), entry, self.cap)
            .await
    }

    /// Rendered history lines, oldest first
    ///
    /// Returns an empty list when the conversation has no history or the
    /// store cannot be read.
    pub async fn history(&self, conversation_id: &str) -> Vec<String> {
        match self.store.range(&self.key(conversation_id)).await {
            Ok(lines) => {
                debug!(
                    conversation_id,
                    lines = lines.len(),
                    "Loaded conversation history"
                );
                lines
            }
            Err(e) => {
                warn!(conversation_id, "Failed to read conversation history: {}", e);
                Vec::new()
            }
        }
    }

    /// Record a user query and the bot reply, logging any failure
    pub async fn record_exchange(&self, conversation_id: &str, user: &str, bot: &str) {
        for (speaker, text) in [(Speaker::User, user), (Speaker::Bot, bot)] {
            if let Err(e) = self.append(conversation_id, speaker, text).await {
                warn!(
                    conversation_id,
                    "Failed to write memory for {} turn: {}", speaker, e
                );
                return;
            }
        }
    }
}

/// Build the history store selected by `memory.backend`
pub async fn open_store(config: &Config) -> Result<Arc<dyn HistoryStore>> {
    match config.memory.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryStore::new())),
        _ => {
            let database = Database::new(&config.db_path()).await?;
            Ok(Arc::new(SqliteStore::new(database.pool().clone())))
        }
    }
}
