//! Chambers Engine Library
//!
//! This library provides the orchestration router behind the chambers bot.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Database persistence module
pub mod db;

/// Language-model gateway and HTTP backends
pub mod llm;

/// Bounded per-conversation history
pub mod memory;

/// Keyword and command intent classification
pub mod router;

/// Agent registry and specialist responders
pub mod agents;

/// Request pipeline: routing, dispatch, fallback, memory
pub mod orchestrator;

/// Telegram webhook transport
pub mod bot;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;

pub use sdk::errors::{AgentError, EngineError, GenerationError, StoreError};
