//! Chambers SDK
//!
//! Shared library providing the responder trait, error taxonomy, and
//! conversation types. Specialist agents depend on this crate only.

/// Responder trait
pub mod responder;

/// Error types and handling
pub mod errors;

/// Conversation and routing types
pub mod types;

// Re-export commonly used types
pub use errors::{AgentError, ChambersErrorExt, EngineError, GenerationError, StoreError};
pub use responder::Responder;
pub use types::{Exchange, RoutingDecision, Speaker};
