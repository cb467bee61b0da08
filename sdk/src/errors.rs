//! Error types and handling
//!
//! This module provides the error types used throughout Chambers.
//! All errors implement the `ChambersErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Taxonomy
//!
//! - [`AgentError`]: a registered responder failed
//! - [`GenerationError`]: a language-model call failed
//! - [`StoreError`]: a conversation-memory read or write failed
//! - [`EngineError`]: startup and configuration failures
//!
//! The first three never cross the orchestrator boundary; they are turned
//! into fixed replies there. `EngineError` is fatal and only raised while the
//! process is being assembled.

use thiserror::Error;

/// Trait for Chambers error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information.
pub trait ChambersErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain:
    /// - Secrets (API keys, tokens, passwords)
    /// - Internal implementation details
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around. Non-recoverable
    /// errors typically require a configuration change and restart.
    fn is_recoverable(&self) -> bool;
}

/// Startup and configuration errors
///
/// # Examples
///
/// ```
/// use sdk::errors::{ChambersErrorExt, EngineError};
///
/// let error = EngineError::DuplicateRoute("memo".to_string());
/// assert!(!error.is_recoverable());
/// println!("Hint: {}", error.user_hint());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Duplicate routing key: {0}")]
    DuplicateRoute(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialist responder failed to produce a result
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Agent failed: {0}")]
    Failed(String),
}

/// A language-model call failed
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// The conversation history store failed
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl ChambersErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Database(_) => "Database could not be opened. Check the data directory",
            Self::DuplicateRoute(_) => "Two agents share a routing key. Fix the registry",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

impl ChambersErrorExt for AgentError {
    fn user_hint(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "The agent could not understand that request",
            Self::Generation(e) => e.user_hint(),
            Self::Failed(_) => "The agent failed. Try again later",
        }
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

impl ChambersErrorExt for GenerationError {
    fn user_hint(&self) -> &str {
        match self {
            Self::ProviderUnavailable(_) => "LLM provider unavailable. Check your network",
            Self::AuthenticationFailed(_) => "LLM provider rejected the credentials",
            Self::RateLimitExceeded => "LLM provider is rate limiting. Please wait",
            Self::InvalidRequest(_) => "LLM provider rejected the request",
            Self::NetworkError(_) => "Network operation failed. Check your connection",
            Self::Timeout => "LLM provider took too long to respond. Try again",
            Self::ParseError(_) => "LLM provider returned an unexpected response",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AuthenticationFailed(_))
    }
}

impl ChambersErrorExt for StoreError {
    fn user_hint(&self) -> &str {
        "Conversation memory is unavailable; replies continue without history"
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}
