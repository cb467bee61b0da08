//! Case-law research agent

use crate::llm::{GenerationOptions, LanguageModel};
use async_trait::async_trait;
use sdk::errors::AgentError;
use sdk::Responder;
use std::sync::Arc;
use tracing::debug;

const MAX_TOKENS: u32 = 800;

/// Answers legal research questions through the language model
pub struct CaseLawScholar {
    llm: Arc<dyn LanguageModel>,
}

impl CaseLawScholar {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    fn prompt(question: &str) -> String {
        format!(
            "You are a case-law scholar for an intertribal court. Research the \
             following question under tribal and federal Indian law. Cite the \
             leading cases and statutes you rely on, then give a short plain-language \
             summary of the answer.\n\nQuestion: {}\n",
            question
        )
    }
}

#[async_trait]
impl Responder for CaseLawScholar {
    fn name(&self) -> &str {
        "case_law_scholar"
    }

    async fn run(&self, query: &str) -> Result<String, AgentError> {
        let question = query.trim();
        if question.is_empty() {
            return Err(AgentError::InvalidRequest(
                "Ask a legal question, e.g. /case What is tribal sovereignty?".to_string(),
            ));
        }

        debug!("Case-law research for {} chars", question.len());

        let options = GenerationOptions::new().with_max_tokens(MAX_TOKENS);
        let answer = self
            .llm
            .generate(&Self::prompt(question), None, &options)
            .await?;

        Ok(answer.trim().to_string())
    }
}
