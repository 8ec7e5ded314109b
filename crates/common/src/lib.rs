//! KAGForge Common Library
//!
//! Shared code for the KAGForge crates including:
//! - Core data model (chunks, entities, relations, reasoning records)
//! - Question planning and reasoning memory
//! - Error types and handling
//! - Configuration management
//! - Entity resolution cache
//! - Metrics and observability

pub mod cache;
pub mod config;
pub mod context;
pub mod errors;
pub mod metrics;
pub mod models;

// Re-export commonly used types
pub use cache::ResolutionCache;
pub use config::AppConfig;
pub use context::{MemoryPolicy, Planner, ReasoningMemory};
pub use errors::{AppError, Result};
pub use models::{
    Chunk, EntityId, EntityNode, ReasoningStep, ReasoningTrace, RelationEdge, SolvedStep,
    SubQuestion,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Passage returned when no similarity index can answer a query
pub const NO_CONTEXT_SENTINEL: &str = "No relevant context found.";
