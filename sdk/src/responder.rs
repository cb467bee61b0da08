//! Responder trait
//!
//! A responder is a specialist that turns a query into a text answer. The
//! engine holds responders behind `Arc<dyn Responder>` in its agent registry
//! and never inspects their concrete type.

use crate::errors::AgentError;
use async_trait::async_trait;

/// Trait that all specialist responders must implement
#[async_trait]
pub trait Responder: Send + Sync {
    /// Returns the canonical name of the responder (e.g., "case_law_scholar")
    fn name(&self) -> &str;

    /// Produce an answer for the query
    ///
    /// # Returns
    /// * `Ok(String)` - The answer text
    /// * `Err(AgentError)` - If the responder could not answer
    async fn run(&self, query: &str) -> Result<String, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl Responder for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn run(&self, query: &str) -> Result<String, AgentError> {
            if query.is_empty() {
                return Err(AgentError::InvalidRequest("empty".into()));
            }
            Ok(query.to_uppercase())
        }
    }

    #[test]
    fn test_responder_is_object_safe() {
        let responder: Arc<dyn Responder> = Arc::new(Echo);
        assert_eq!(responder.name(), "echo");
    }

    #[tokio::test]
    async fn test_responder_run() {
        let responder: Arc<dyn Responder> = Arc::new(Echo);
        assert_eq!(responder.run("hi").await.ok(), Some("HI".to_string()));
        assert!(matches!(
            responder.run("").await,
            Err(AgentError::InvalidRequest(_))
        ));
    }
}
