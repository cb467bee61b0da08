//! Memo drafting agent

use crate::llm::{GenerationOptions, LanguageModel};
use async_trait::async_trait;
use sdk::errors::AgentError;
use sdk::Responder;
use std::sync::Arc;

const MAX_TOKENS: u32 = 1200;

/// Drafts internal memos and briefs through the language model
pub struct MemoDrafter {
    llm: Arc<dyn LanguageModel>,
}

impl MemoDrafter {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Responder for MemoDrafter {
    fn name(&self) -> &str {
        "memo_drafter"
    }

    async fn run(&self, query: &str) -> Result<String, AgentError> {
        let request = query.trim();
        if request.is_empty() {
            return Err(AgentError::InvalidRequest(
                "Describe the memo to draft, e.g. /memo quarterly budget update".to_string(),
            ));
        }

        let prompt = format!(
            "Draft a professional internal memo for the Office of the Chief Justice.\n\
             Use the headings To, From, Date, Subject, followed by a concise body \
             and a closing line.\n\nRequest: {}\n",
            request
        );

        let options = GenerationOptions::new()
            .with_max_tokens(MAX_TOKENS)
            .with_temperature(0.4);
        let memo = self.llm.generate(&prompt, None, &options).await?;

        Ok(memo.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PromptContext;
    use sdk::errors::GenerationError;
    use std::sync::Mutex;

    struct EchoModel {
        last: Mutex<Option<(String, GenerationOptions)>>,
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(
            &self,
            prompt: &str,
            _context: Option<&PromptContext>,
            options: &GenerationOptions,
        ) -> Result<String, GenerationError> {
            *self.last.lock().unwrap() = Some((prompt.to_string(), *options));
            Ok("To: Staff\nSubject: Budget\n".into())
        }
    }

    #[tokio::test]
    async fn test_memo_prompt_and_budget() {
        let model = Arc::new(EchoModel {
            last: Mutex::new(None),
        });
        let drafter = MemoDrafter::new(model.clone());

        let memo = drafter.run("quarterly budget update").await.unwrap();
        assert_eq!(memo, "To: Staff\nSubject: Budget");

        let (prompt, options) = model.last.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Request: quarterly budget update"));
        assert_eq!(options.max_tokens, Some(MAX_TOKENS));
    }

    #[tokio::test]
    async fn test_empty_request_rejected() {
        let drafter = MemoDrafter::new(Arc::new(EchoModel {
            last: Mutex::new(None),
        }));
        assert!(drafter.run("").await.is_err());
    }
}
