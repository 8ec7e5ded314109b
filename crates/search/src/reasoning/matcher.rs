//! Answer entity matching
//!
//! Maps candidate surface strings (produced by an external entity
//! recognizer) onto graph nodes, and builds a trace that falls back to
//! fuzzy node suggestions when no path links the candidates.

use super::reasoner::GraphReasoner;
use crate::graph::EntityGraph;
use kagforge_common::cache::ResolutionCache;
use kagforge_common::config::MatcherConfig;
use kagforge_common::models::{EntityId, ReasoningTrace};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Graph node close to a candidate or to a present entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub candidate: String,
    pub node: EntityId,
    pub score: f64,
}

/// Trace for a set of answer candidates plus the matching diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerExplanation {
    pub trace: ReasoningTrace,
    /// Candidates resolved to graph nodes, in candidate order
    pub present: Vec<EntityId>,
    /// Fuzzy suggestions for unresolved candidates, and for present
    /// entities when no path was found
    pub suggestions: Vec<Suggestion>,
}

/// Resolves surface strings against one graph snapshot
pub struct EntityMatcher<'g> {
    graph: &'g EntityGraph,
    match_aliases: bool,
    fuzzy_cutoff: f64,
    max_suggestions: usize,
}

impl<'g> EntityMatcher<'g> {
    pub fn new(graph: &'g EntityGraph, config: &MatcherConfig) -> Self {
        Self {
            graph,
            match_aliases: false,
            fuzzy_cutoff: config.fuzzy_cutoff,
            max_suggestions: config.max_suggestions,
        }
    }

    /// Also accept aliases as a match
    pub fn with_alias_matching(mut self, enabled: bool) -> Self {
        self.match_aliases = enabled;
        self
    }

    /// Canonical id for a surface string, memoized in `cache`
    pub fn resolve(&self, surface: &str, cache: &mut ResolutionCache) -> Option<EntityId> {
        cache.get_or_resolve(surface, |s| self.lookup(s))
    }

    /// Resolved candidates in input order, duplicates removed
    pub fn match_candidates<S: AsRef<str>>(
        &self,
        candidates: &[S],
        cache: &mut ResolutionCache,
    ) -> Vec<EntityId> {
        let mut present: Vec<EntityId> = Vec::new();
        for candidate in candidates {
            if let Some(id) = self.resolve(candidate.as_ref().trim(), cache) {
                if !present.contains(&id) {
                    present.push(id);
                }
            }
        }
        present
    }

    /// Nodes whose id is close to `surface`, best first.
    ///
    /// An exact match is never suggested for itself.
    pub fn closest_nodes(&self, surface: &str) -> Vec<Suggestion> {
        let needle = surface.to_lowercase();
        let mut scored: Vec<Suggestion> = self
            .graph
            .node_ids()
            .filter(|id| id.as_str() != surface)
            .map(|id| Suggestion {
                candidate: surface.to_string(),
                node: id.clone(),
                score: strsim::normalized_levenshtein(&needle, &id.as_str().to_lowercase()),
            })
            .filter(|s| s.score >= self.fuzzy_cutoff)
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.node.cmp(&b.node))
        });
        scored.truncate(self.max_suggestions);
        scored
    }

    /// Explain the candidates with a graph trace.
    ///
    /// Unresolved candidates always get close-node suggestions. When the
    /// candidates resolve but no path links them, every present entity gets
    /// suggestions too.
    #[instrument(skip(self, candidates, cache, reasoner), fields(candidates = candidates.len()))]
    pub fn explain_with_fallback<S: AsRef<str>>(
        &self,
        reasoner: &GraphReasoner<'_>,
        candidates: &[S],
        cache: &mut ResolutionCache,
    ) -> AnswerExplanation {
        let present = self.match_candidates(candidates, cache);
        let trace = reasoner.explain_answer(&present);

        let mut surfaces: Vec<&str> = Vec::new();
        if trace == ReasoningTrace::NoPath {
            surfaces.extend(present.iter().map(EntityId::as_str));
        }
        surfaces.extend(
            candidates
                .iter()
                .map(|c| c.as_ref().trim())
                .filter(|c| !c.is_empty() && cache.peek(c).is_some_and(Option::is_none)),
        );

        let suggestions: Vec<Suggestion> = surfaces
            .into_iter()
            .flat_map(|surface| self.closest_nodes(surface))
            .collect();

        debug!(
            present = present.len(),
            suggestions = suggestions.len(),
            path = trace.is_path(),
            "Explained answer"
        );

        AnswerExplanation {
            trace,
            present,
            suggestions,
        }
    }

    fn lookup(&self, surface: &str) -> Option<EntityId> {
        if surface.is_empty() {
            return None;
        }
        if let Some(node) = self.graph.node(surface) {
            return Some(node.canonical_id.clone());
        }
        if !self.match_aliases {
            return None;
        }
        self.graph
            .nodes()
            .find(|node| node.aliases.iter().any(|alias| alias == surface))
            .map(|node| node.canonical_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kagforge_common::models::EntityNode;

    fn graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.upsert_node(EntityNode::new("Apple", "ORG").with_alias("Apple Inc."));
        graph.add_relation("Apple", "Beats", "ACQUIRED");
        graph.add_relation("Beats", "Dre", "FOUNDED_BY");
        graph.upsert_node(EntityNode::new("Samsung", "ORG"));
        graph
    }

    fn matcher(graph: &EntityGraph) -> EntityMatcher<'_> {
        EntityMatcher::new(graph, &MatcherConfig::default())
    }

    #[test]
    fn test_exact_and_alias_resolution() {
        let graph = graph();
        let mut cache = ResolutionCache::new();

        assert_eq!(matcher(&graph).resolve("Apple", &mut cache), Some(EntityId::from("Apple")));
        assert_eq!(matcher(&graph).resolve("Apple Inc.", &mut cache), None);

        let mut fresh = ResolutionCache::new();
        let aliased = matcher(&graph).with_alias_matching(true);
        assert_eq!(aliased.resolve("Apple Inc.", &mut fresh), Some(EntityId::from("Apple")));
    }

    #[test]
    fn test_resolution_is_memoized() {
        let graph = graph();
        let matcher = matcher(&graph);
        let mut cache = ResolutionCache::new();

        matcher.resolve("Beats", &mut cache);
        matcher.resolve("Beats", &mut cache);
        matcher.resolve("Nokia", &mut cache);

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.peek("Nokia"), Some(&None));
    }

    #[test]
    fn test_match_candidates_dedupes_in_order() {
        let graph = graph();
        let mut cache = ResolutionCache::new();
        let present =
            matcher(&graph).match_candidates(&["Dre", " Apple ", "Nokia", "Dre"], &mut cache);
        assert_eq!(present, vec![EntityId::from("Dre"), EntityId::from("Apple")]);
    }

    #[test]
    fn test_closest_nodes() {
        let graph = graph();
        let suggestions = matcher(&graph).closest_nodes("Beatz");

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].node, EntityId::from("Beats"));
        assert!(suggestions[0].score >= 0.6);
        assert!(matcher(&graph).closest_nodes("Beats").is_empty());
        assert!(matcher(&graph).closest_nodes("zzzzzz").is_empty());
    }

    #[test]
    fn test_fallback_suggests_for_unknown_candidates() {
        let graph = graph();
        let reasoner = GraphReasoner::new(&graph);
        let mut cache = ResolutionCache::new();

        let explanation =
            matcher(&graph).explain_with_fallback(&reasoner, &["Apple", "Samsnug"], &mut cache);

        assert_eq!(explanation.trace, ReasoningTrace::NotApplicable);
        assert_eq!(explanation.present, vec![EntityId::from("Apple")]);
        assert_eq!(explanation.suggestions.len(), 1);
        assert_eq!(explanation.suggestions[0].candidate, "Samsnug");
        assert_eq!(explanation.suggestions[0].node, EntityId::from("Samsung"));
    }

    #[test]
    fn test_path_found_needs_no_suggestions() {
        let graph = graph();
        let reasoner = GraphReasoner::new(&graph);
        let mut cache = ResolutionCache::new();

        let explanation =
            matcher(&graph).explain_with_fallback(&reasoner, &["Apple", "Dre"], &mut cache);

        assert!(explanation.trace.is_path());
        assert_eq!(
            explanation.trace.to_string(),
            "Path: Apple -[ACQUIRED]-> Beats -[FOUNDED_BY]-> Dre"
        );
        assert!(explanation.suggestions.is_empty());
    }

    #[test]
    fn test_no_path_suggests_near_present_entities() {
        let mut graph = graph();
        graph.upsert_node(EntityNode::new("Apples", "PRODUCT"));
        let reasoner = GraphReasoner::new(&graph);
        let mut cache = ResolutionCache::new();

        let explanation =
            matcher(&graph).explain_with_fallback(&reasoner, &["Dre", "Apple"], &mut cache);

        assert_eq!(explanation.trace, ReasoningTrace::NoPath);
        assert_eq!(
            explanation.present,
            vec![EntityId::from("Dre"), EntityId::from("Apple")]
        );
        assert_eq!(explanation.suggestions.len(), 1);
        assert_eq!(explanation.suggestions[0].candidate, "Apple");
        assert_eq!(explanation.suggestions[0].node, EntityId::from("Apples"));
    }
}
