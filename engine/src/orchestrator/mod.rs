//! Orchestrator
//!
//! Handles one inbound message end to end:
//!
//! ```text
//! START → PARSED → {DISPATCHED | FALLBACK} → [POST-PROCESSED] → [MEMORY-UPDATED] → DONE
//! ```
//!
//! 1. Blank input gets a fixed prompt-for-input reply.
//! 2. The [`IntentRouter`] picks a routing key and query.
//! 3. A registered key is dispatched to its responder.
//! 4. Anything else falls back to the language model, with the system prompt
//!    and the conversation history as context.
//! 5. Case-law answers get a one-line witty summary on top.
//! 6. Conversational turns are written to [`ConversationMemory`].
//!
//! Every stage contains its own failures. `handle` always returns reply text
//! and never an error.

use crate::agents::AgentRegistry;
use crate::config::OrchestratorConfig;
use crate::llm::{GenerationOptions, LanguageModel, PromptContext};
use crate::memory::ConversationMemory;
use crate::router::{IntentRouter, GENERIC_ROUTE};
use sdk::errors::{ChambersErrorExt, GenerationError};
use sdk::types::RoutingDecision;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Canonical key of the agent whose answers get a summary line
pub const CASE_LAW_ROUTE: &str = "case_law_scholar";

/// Path a request took through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Dispatched,
    Fallback,
}

/// Routes messages to agents or the fallback model
pub struct Orchestrator {
    router: IntentRouter,
    registry: Arc<AgentRegistry>,
    llm: Arc<dyn LanguageModel>,
    memory: ConversationMemory,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        llm: Arc<dyn LanguageModel>,
        memory: ConversationMemory,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            router: IntentRouter::new(),
            registry,
            llm,
            memory,
            config,
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Produce the reply for one message
    pub async fn handle(&self, conversation_id: &str, raw_text: &str) -> String {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!(conversation_id, "Empty input, prompting for text");
            return self.config.replies.empty_input.clone();
        }

        let decision = self.router.parse(text);
        let route = decision.key.as_str();
        info!(conversation_id, route, "Routing message");
        debug!(conversation_id, route, query = %decision.query, "PARSED");

        let (path, canonical, mut result) = match self.registry.resolve(route) {
            Some(responder) => {
                debug!(conversation_id, route, agent = responder.name(), "DISPATCHED");

                match responder.run(&decision.query).await {
                    Ok(result) => (
                        Path::Dispatched,
                        self.registry.canonical_key(route),
                        result,
                    ),
                    Err(e) => {
                        error!(
                            conversation_id,
                            route,
                            agent = responder.name(),
                            "Agent failed: {} ({})",
                            e,
                            e.user_hint()
                        );
                        return self.config.replies.agent_failure.clone();
                    }
                }
            }
            None => {
                debug!(conversation_id, route, "FALLBACK");

                match self.fallback(conversation_id, &decision).await {
                    Ok(result) => (Path::Fallback, None, result),
                    Err(e) => {
                        error!(
                            conversation_id,
                            route,
                            recoverable = e.is_recoverable(),
                            "LLM fallback failed: {}",
                            e
                        );
                        return self.config.replies.generation_failure.clone();
                    }
                }
            }
        };

        if canonical == Some(CASE_LAW_ROUTE) && !result.is_empty() {
            result = self.summarize(result).await;
            debug!(conversation_id, route, "POST-PROCESSED");
        }

        if Self::is_conversational(path, route) {
            self.memory
                .record_exchange(conversation_id, &decision.query, &result)
                .await;
            debug!(conversation_id, route, "MEMORY-UPDATED");
        }

        debug!(conversation_id, route, reply_chars = result.chars().count(), "DONE");
        result
    }

    /// Turns that belong in conversation memory
    fn is_conversational(path: Path, route: &str) -> bool {
        path == Path::Fallback || route == GENERIC_ROUTE
    }

    async fn fallback(
        &self,
        conversation_id: &str,
        decision: &RoutingDecision,
    ) -> Result<String, GenerationError> {
        let mut lines = Vec::new();
        if !self.config.system_prompt.trim().is_empty() {
            lines.push(self.config.system_prompt.clone());
        }

        let history = self.memory.history(conversation_id).await;
        if !history.is_empty() {
            debug!(conversation_id, lines = history.len(), "Using conversation history");
        }
        lines.extend(history);

        let context = PromptContext::Lines(lines);
        let options = GenerationOptions::new().with_max_tokens(self.config.fallback_max_tokens);

        self.llm
            .generate(&decision.query, Some(&context), &options)
            .await
    }

    /// Prepend a one-sentence summary, keeping `result` unchanged on failure
    async fn summarize(&self, result: String) -> String {
        let prompt = summary_prompt(&result);
        let options = GenerationOptions::new().with_max_tokens(self.config.summary_max_tokens);

        match self.llm.generate(&prompt, None, &options).await {
            Ok(summary) if !summary.trim().is_empty() => format!(
                "{} {}\n\n{}",
                self.config.replies.summary_marker,
                summary.trim(),
                result
            ),
            Ok(_) => result,
            Err(e) => {
                warn!("Failed to create case-law summary: {}", e);
                result
            }
        }
    }
}

fn summary_prompt(result: &str) -> String {
    format!(
        "In a single witty sentence, summarize this legal explanation for Telegram:\n\n{}\n",
        result
    )
}
