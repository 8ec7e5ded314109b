//! Multi-hop retrieval
//!
//! Two retrieval mechanisms behind one adapter:
//! - Similarity search over passages (hop 1)
//! - Graph-guided pivoting through entities found in hop-1 passages (hop 2)

mod hybrid;
mod multi_hop;

pub use hybrid::{Capability, HybridIndex};
pub use multi_hop::{discover_entities, MultiHopRetriever, MAX_HOPS};

/// Common trait for retrievers driven by the solver.
///
/// Retrieval never fails: unavailable or failing collaborators degrade to
/// the no-context sentinel.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    /// At most `k` distinct passages for the query, most relevant first
    async fn retrieve(&self, query: &str, k: usize, hops: usize) -> Vec<String>;
}
