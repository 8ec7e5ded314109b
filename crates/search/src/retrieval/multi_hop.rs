//! Multi-hop retriever
//!
//! 1. Hop 1: top-k similarity search for the query
//! 2. Entity discovery: graph ids occurring verbatim in hop-1 passages
//! 3. Hop 2: one best passage per discovered entity, queried by its id
//! 4. Merge without duplicates, hop-1 passages first, truncate to k
//!
//! Expansion stops at two hops regardless of the requested budget.

use super::{Capability, HybridIndex, Retriever};
use crate::graph::EntityGraph;
use crate::index::SimilarityIndex;
use kagforge_common::metrics::{self, RetrievalOutcome};
use kagforge_common::models::EntityId;
use kagforge_common::NO_CONTEXT_SENTINEL;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Deepest expansion performed
pub const MAX_HOPS: usize = 2;

/// Passages requested per pivot entity in hop 2
const PIVOT_K: usize = 1;

/// Bounded two-hop retriever over a hybrid index
pub struct MultiHopRetriever {
    sources: HybridIndex,

    /// Also match entity aliases when discovering pivots
    match_aliases: bool,
}

impl MultiHopRetriever {
    /// Create a new retriever
    pub fn new(sources: HybridIndex) -> Self {
        Self {
            sources,
            match_aliases: false,
        }
    }

    /// Enable alias matching during entity discovery
    pub fn with_alias_matching(mut self, enabled: bool) -> Self {
        self.match_aliases = enabled;
        self
    }

    pub fn sources(&self) -> &HybridIndex {
        &self.sources
    }

    /// Hop-1 search; `None` when the index failed
    async fn first_hop(
        &self,
        index: &dyn SimilarityIndex,
        query: &str,
        k: usize,
    ) -> Option<Vec<String>> {
        match index.search(query, k).await {
            Ok(passages) => {
                let mut merged = Passages::with_limit(k);
                merged.extend(passages);
                Some(merged.into_vec())
            }
            Err(e) => {
                warn!(index = index.name(), error = %e, "Hop-1 search failed, returning sentinel");
                metrics::record_index_error("hop1");
                None
            }
        }
    }

    /// Hop-1 passages merged with one pivot passage per discovered entity
    async fn expand(
        &self,
        index: &dyn SimilarityIndex,
        graph: &EntityGraph,
        first_hop: Vec<String>,
        k: usize,
    ) -> (Vec<String>, usize) {
        let pivots = discover_entities(graph, &first_hop, self.match_aliases);
        debug!(pivots = pivots.len(), "Discovered pivot entities");

        let mut merged = Passages::with_limit(usize::MAX);
        merged.extend(first_hop);

        for entity in &pivots {
            match index.search(entity.as_str(), PIVOT_K).await {
                Ok(passages) => merged.extend(passages),
                Err(e) => {
                    warn!(entity = %entity, error = %e, "Hop-2 search failed, skipping pivot");
                    metrics::record_index_error("hop2");
                }
            }
        }

        let mut passages = merged.into_vec();
        passages.truncate(k);
        (passages, pivots.len())
    }
}

#[async_trait::async_trait]
impl Retriever for MultiHopRetriever {
    async fn retrieve(&self, query: &str, k: usize, hops: usize) -> Vec<String> {
        if hops > MAX_HOPS {
            debug!(requested = hops, max = MAX_HOPS, "Hop budget capped");
        }

        let capability = self.sources.capability();
        let capability_name = capability.as_str();
        let (index, graph) = match capability {
            Capability::Unavailable | Capability::GraphOnly(_) => {
                debug!(capability = capability_name, "No similarity index configured");
                metrics::record_retrieval(RetrievalOutcome::NoIndex, 0);
                return vec![NO_CONTEXT_SENTINEL.to_string()];
            }
            Capability::VectorOnly(index) => (index, None),
            Capability::Hybrid(index, graph) => (index, Some(graph)),
        };

        let Some(first_hop) = self.first_hop(index, query, k).await else {
            metrics::record_retrieval(RetrievalOutcome::IndexError, 0);
            return vec![NO_CONTEXT_SENTINEL.to_string()];
        };

        let graph = match graph {
            Some(graph) if hops >= MAX_HOPS => graph,
            _ => {
                metrics::record_retrieval(RetrievalOutcome::SingleHop, 0);
                return first_hop;
            }
        };

        let (passages, pivots) = self.expand(index, graph, first_hop, k).await;
        metrics::record_retrieval(RetrievalOutcome::TwoHop, pivots);
        debug!(k, passages = passages.len(), "Two-hop retrieval complete");
        passages
    }
}

/// Graph entities mentioned verbatim in any passage, in graph insertion order.
///
/// Matching is plain substring search on canonical ids (plus aliases when
/// enabled). Short ids will match inside unrelated words; empty surface
/// strings are skipped since they would match every passage.
pub fn discover_entities(
    graph: &EntityGraph,
    passages: &[String],
    match_aliases: bool,
) -> Vec<EntityId> {
    graph
        .nodes()
        .filter(|node| {
            let mentioned = |surface: &str| {
                !surface.is_empty() && passages.iter().any(|p| p.contains(surface))
            };
            if match_aliases {
                node.surface_forms().any(mentioned)
            } else {
                mentioned(node.canonical_id.as_str())
            }
        })
        .map(|node| node.canonical_id.clone())
        .collect()
}

/// Insertion-ordered passage set with an upper bound
struct Passages {
    seen: HashSet<String>,
    ordered: Vec<String>,
    limit: usize,
}

impl Passages {
    fn with_limit(limit: usize) -> Self {
        Self {
            seen: HashSet::new(),
            ordered: Vec::new(),
            limit,
        }
    }

    fn extend(&mut self, passages: impl IntoIterator<Item = String>) {
        for passage in passages {
            if self.ordered.len() >= self.limit {
                return;
            }
            if self.seen.insert(passage.clone()) {
                self.ordered.push(passage);
            }
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
