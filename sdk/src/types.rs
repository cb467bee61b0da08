//! Conversation and routing types shared by the engine and responders

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who contributed a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The human on the other side of the chat
    User,

    /// The assistant
    Bot,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "USER"),
            Speaker::Bot => write!(f, "BOT"),
        }
    }
}

/// One turn of a conversation. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exchange {
    pub speaker: Speaker,
    pub text: String,
}

impl Exchange {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Create a bot turn
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    /// Render as a history line, e.g. `"USER: hello"`
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker, self.text)
    }
}

/// Output of intent classification
///
/// `key` may or may not name a registered responder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutingDecision {
    pub key: String,
    pub query: String,
}

impl RoutingDecision {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: query.into(),
        }
    }
}
