//! Agent registry and specialist responders
//!
//! The registry maps routing keys to responders. Each responder is bound to
//! one canonical key and any number of aliases, all resolving to the same
//! shared instance. The table is assembled once through
//! [`AgentRegistryBuilder`] and is read-only afterwards, so concurrent
//! lookups need no locking.

pub mod case_law;
pub mod file_conversion;
pub mod memo;

pub use case_law::CaseLawScholar;
pub use file_conversion::FileConversion;
pub use memo::MemoDrafter;

use crate::llm::LanguageModel;
use sdk::errors::EngineError;
use sdk::Responder;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A responder and the keys it answers to
#[derive(Clone)]
pub struct AgentDescriptor {
    pub canonical_key: String,
    pub aliases: Vec<String>,
    pub responder: Arc<dyn Responder>,
}

/// Immutable key → responder table
pub struct AgentRegistry {
    routes: HashMap<String, Arc<dyn Responder>>,
    descriptors: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    pub fn builder() -> AgentRegistryBuilder {
        AgentRegistryBuilder::default()
    }

    /// Look up the responder bound to `key` (canonical or alias)
    pub fn resolve(&self, key: &str) -> Option<Arc<dyn Responder>> {
        self.routes.get(key).cloned()
    }

    /// Canonical key of the agent that `key` resolves to
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.descriptors
            .iter()
            .find(|d| d.canonical_key == key || d.aliases.iter().any(|a| a == key))
            .map(|d| d.canonical_key.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Every registered key, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn descriptors(&self) -> &[AgentDescriptor] {
        &self.descriptors
    }
}

/// Builder collecting registrations before the table is frozen
#[derive(Default)]
pub struct AgentRegistryBuilder {
    routes: HashMap<String, Arc<dyn Responder>>,
    descriptors: Vec<AgentDescriptor>,
    error: Option<EngineError>,
}

impl AgentRegistryBuilder {
    /// Register `responder` under `canonical_key` and `aliases`
    ///
    /// Binding a key that already points at a different instance is recorded
    /// and reported by [`build`](Self::build).
    pub fn register(
        mut self,
        canonical_key: &str,
        aliases: &[&str],
        responder: Arc<dyn Responder>,
    ) -> Self {
        for key in std::iter::once(&canonical_key).chain(aliases.iter()) {
            self.bind(key, &responder);
        }

        self.descriptors.push(AgentDescriptor {
            canonical_key: canonical_key.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            responder,
        });
        self
    }

    fn bind(&mut self, key: &str, responder: &Arc<dyn Responder>) {
        if self.error.is_some() {
            return;
        }

        match self.routes.get(key) {
            Some(existing) if Arc::ptr_eq(existing, responder) => {
                debug!("Key '{}' already bound to {}", key, responder.name());
            }
            Some(existing) => {
                self.error = Some(EngineError::DuplicateRoute(format!(
                    "'{}' is bound to both '{}' and '{}'",
                    key,
                    existing.name(),
                    responder.name()
                )));
            }
            None => {
                self.routes.insert(key.to_string(), responder.clone());
            }
        }
    }

    /// Freeze the table
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DuplicateRoute` if any key was bound to two
    /// different responders.
    pub fn build(self) -> Result<AgentRegistry, EngineError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        info!(
            "Agent registry built with {} agents and {} keys",
            self.descriptors.len(),
            self.routes.len()
        );

        Ok(AgentRegistry {
            routes: self.routes,
            descriptors: self.descriptors,
        })
    }
}

/// Registry of the three specialist agents sharing one language model
pub fn default_registry(llm: Arc<dyn LanguageModel>) -> Result<AgentRegistry, EngineError> {
    AgentRegistry::builder()
        .register(
            "case_law_scholar",
            &["case", "law", "sovereignty", "case_law", "precedent"],
            Arc::new(CaseLawScholar::new(llm.clone())),
        )
        .register(
            "memo_drafter",
            &["memo", "draft", "memo_draft"],
            Arc::new(MemoDrafter::new(llm)),
        )
        .register(
            "file_conversion",
            &[
                "convert",
                "convert_file",
                "file",
                "csv_to_xlsx",
                "xlsx_to_csv",
                "pdf_to_docx",
            ],
            Arc::new(FileConversion::new()),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sdk::errors::AgentError;

    struct Named(&'static str);

    #[async_trait]
    impl Responder for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn run(&self, query: &str) -> Result<String, AgentError> {
            Ok(format!("{}:{}", self.0, query))
        }
    }

    #[test]
    fn test_alias_resolves_to_same_instance() {
        let responder: Arc<dyn Responder> = Arc::new(Named("scholar"));
        let registry = AgentRegistry::builder()
            .register("case_law_scholar", &["case", "law"], responder.clone())
            .build()
            .unwrap();

        let canonical = registry.resolve("case_law_scholar").unwrap();
        let alias = registry.resolve("law").unwrap();
        assert!(Arc::ptr_eq(&canonical, &alias));
        assert!(Arc::ptr_eq(&canonical, &responder));
        assert!(registry.resolve("help").is_none());
        assert_eq!(registry.canonical_key("law"), Some("case_law_scholar"));
        assert_eq!(registry.canonical_key("help"), None);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let result = AgentRegistry::builder()
            .register("memo_drafter", &["draft"], Arc::new(Named("memo")))
            .register("drafts", &["draft"], Arc::new(Named("other")))
            .build();

        match result {
            Err(EngineError::DuplicateRoute(msg)) => assert!(msg.contains("'draft'")),
            _ => panic!("expected DuplicateRoute"),
        }
    }

    #[test]
    fn test_rebinding_same_instance_is_idempotent() {
        let responder: Arc<dyn Responder> = Arc::new(Named("memo"));
        let registry = AgentRegistry::builder()
            .register("memo_drafter", &["memo", "memo"], responder.clone())
            .register("memo_drafter", &[], responder)
            .build()
            .unwrap();

        assert_eq!(registry.keys(), vec!["memo", "memo_drafter"]);
    }

    #[test]
    fn test_keys_are_sorted() {
        let registry = AgentRegistry::builder()
            .register("b", &["c", "a"], Arc::new(Named("x")))
            .build()
            .unwrap();
        assert_eq!(registry.keys(), vec!["a", "b", "c"]);
        assert_eq!(registry.descriptors().len(), 1);
        assert!(registry.contains("c"));
    }
}
