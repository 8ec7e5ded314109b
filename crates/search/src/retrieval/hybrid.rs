//! Hybrid index adapter
//!
//! Uniform view over an optional similarity index and an optional entity
//! graph. Callers inspect `capability()` once per operation instead of
//! probing each collaborator separately.

use crate::graph::EntityGraph;
use crate::index::SimilarityIndex;
use std::sync::Arc;

/// What the configured collaborators can answer
pub enum Capability<'a> {
    /// Neither collaborator configured
    Unavailable,
    /// Graph only; passages cannot be retrieved
    GraphOnly(&'a EntityGraph),
    /// Similarity search only
    VectorOnly(&'a dyn SimilarityIndex),
    /// Similarity search plus graph pivoting
    Hybrid(&'a dyn SimilarityIndex, &'a EntityGraph),
}

impl Capability<'_> {
    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Unavailable => "unavailable",
            Capability::GraphOnly(_) => "graph_only",
            Capability::VectorOnly(_) => "vector_only",
            Capability::Hybrid(_, _) => "hybrid",
        }
    }
}

/// Read-only handles to the session's index and graph
#[derive(Clone, Default)]
pub struct HybridIndex {
    index: Option<Arc<dyn SimilarityIndex>>,
    graph: Option<Arc<EntityGraph>>,
}

impl HybridIndex {
    /// Create an adapter over whichever collaborators are available
    pub fn new(index: Option<Arc<dyn SimilarityIndex>>, graph: Option<Arc<EntityGraph>>) -> Self {
        Self { index, graph }
    }

    /// Adapter with no collaborators
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: Arc<dyn SimilarityIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_graph(mut self, graph: Arc<EntityGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn index(&self) -> Option<&dyn SimilarityIndex> {
        self.index.as_deref()
    }

    pub fn graph(&self) -> Option<&EntityGraph> {
        self.graph.as_deref()
    }

    /// Current capability of the adapter
    pub fn capability(&self) -> Capability<'_> {
        match (self.index.as_deref(), self.graph.as_deref()) {
            (None, None) => Capability::Unavailable,
            (None, Some(graph)) => Capability::GraphOnly(graph),
            (Some(index), None) => Capability::VectorOnly(index),
            (Some(index), Some(graph)) => Capability::Hybrid(index, graph),
        }
    }
}
