//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - serve: Run the webhook server
//! - ask: Handle one message locally
//! - route: Show the routing decision for a message
//! - history: Show a conversation's stored history
//! - config: Show the configuration path or contents

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::agents::default_registry;
use crate::bot::{TelegramClient, WebhookState};
use crate::config::Config;
use crate::llm::{LanguageModel, LlmClient};
use crate::memory::{self, ConversationMemory};
use crate::orchestrator::Orchestrator;
use crate::router::IntentRouter;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Conversation memory over the configured store
pub async fn open_memory(config: &Config) -> Result<ConversationMemory> {
    let store = memory::open_store(config)
        .await
        .context("Failed to open conversation store")?;

    Ok(ConversationMemory::new(
        store,
        config.memory.turns,
        config.memory.key_prefix.clone(),
    ))
}

/// Assemble the orchestrator from configuration
///
/// Fails on an unusable LLM backend, a conflicting agent table or an
/// unreachable history store. Nothing is retried here.
pub async fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let llm: Arc<dyn LanguageModel> = Arc::new(LlmClient::from_config(&config.llm)?);
    let registry = default_registry(llm.clone())?;
    let memory = open_memory(config).await?;

    tracing::info!(
        "Orchestrator ready: backend={}, memory={}, agents={}",
        config.llm.backend,
        config.memory.backend,
        registry.descriptors().len()
    );

    Ok(Orchestrator::new(
        Arc::new(registry),
        llm,
        memory,
        config.orchestrator.clone(),
    ))
}

/// Run the webhook server until Ctrl+C
pub async fn handle_serve(config: &Config, bind: Option<String>) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(config).await?);

    let telegram = match &config.telegram.token {
        Some(token) => Some(TelegramClient::new(
            token.clone(),
            config.telegram.api_url.clone(),
        )),
        None => {
            tracing::warn!("TELEGRAM_TOKEN not set; replies will only be returned in the HTTP response");
            None
        }
    };

    let state = WebhookState::new(
        orchestrator,
        telegram,
        config.telegram.webhook_secret.clone(),
    );

    let addr = bind.unwrap_or_else(|| config.telegram.bind.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    crate::bot::serve(listener, state, async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received Ctrl+C, shutting down");
    })
    .await
}

/// Handle one message and print the reply
pub async fn handle_ask(
    text: &str,
    conversation: &str,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let reply = orchestrator.handle(conversation, text).await;

    match format {
        OutputFormat::Text => println!("{}", reply),
        OutputFormat::Json => {
            let output = json!({
                "conversation": conversation,
                "reply": reply,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the routing decision for a message
pub async fn handle_route(text: &str, config: &Config, format: OutputFormat) -> Result<()> {
    let llm: Arc<dyn LanguageModel> = Arc::new(LlmClient::from_config(&config.llm)?);
    let registry = default_registry(llm)?;
    let decision = IntentRouter::new().parse(text);
    let agent = registry.canonical_key(&decision.key);

    match format {
        OutputFormat::Text => {
            println!("Key:   {}", decision.key);
            println!("Query: {}", decision.query);
            match agent {
                Some(agent) => println!("Agent: {}", agent),
                None => println!("Agent: (fallback to language model)"),
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "key": decision.key,
                "query": decision.query,
                "agent": agent,
                "fallback": agent.is_none(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the stored history of a conversation
pub async fn handle_history(conversation: &str, config: &Config, format: OutputFormat) -> Result<()> {
    let memory = open_memory(config).await?;
    let lines = memory.history(conversation).await;

    match format {
        OutputFormat::Text => {
            if lines.is_empty() {
                println!("No history for conversation {}", conversation);
                return Ok(());
            }
            println!(
                "History for {} ({} of {} lines):",
                memory.key(conversation),
                lines.len(),
                memory.cap()
            );
            println!();
            for line in &lines {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "key": memory.key(conversation),
                "cap": memory.cap(),
                "lines": lines,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Print the configuration file location
pub fn handle_config_path(custom: Option<&Path>) -> Result<()> {
    let path = match custom {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

/// Print the effective configuration with secrets masked
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    let redacted = config.redacted();

    match format {
        OutputFormat::Text => {
            let text = toml::to_string_pretty(&redacted).context("Failed to render config")?;
            println!("{}", text);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&redacted)?),
    }

    Ok(())
}
