//! Graph Reasoner - Path finding, clique matching and relation inference
//!
//! Every query runs against a borrowed, read-only graph snapshot. Missing
//! entities are answered with `None` or an empty result, never an error.

use super::cliques::maximal_cliques;
use crate::graph::EntityGraph;
use kagforge_common::models::{EntityId, ReasoningTrace};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::debug;

/// Edge bound used by `explain_answer` unless configured otherwise
pub const DEFAULT_MAX_PATH_HOPS: usize = 3;

/// Stateless reasoner over one graph snapshot
pub struct GraphReasoner<'g> {
    graph: &'g EntityGraph,
    max_path_hops: usize,
}

impl<'g> GraphReasoner<'g> {
    /// Create a new reasoner
    pub fn new(graph: &'g EntityGraph) -> Self {
        Self {
            graph,
            max_path_hops: DEFAULT_MAX_PATH_HOPS,
        }
    }

    /// Override the edge bound used by `explain_answer`
    pub fn with_max_path_hops(mut self, max_path_hops: usize) -> Self {
        self.max_path_hops = max_path_hops;
        self
    }

    pub fn graph(&self) -> &'g EntityGraph {
        self.graph
    }

    /// Shortest directed path using at most `max_hops` edges.
    ///
    /// Breadth-first; among equally short paths the one reached through
    /// earlier-inserted edges wins.
    pub fn find_path(&self, source: &str, target: &str, max_hops: usize) -> Option<Vec<EntityId>> {
        let start = self.graph.node(source)?;
        if !self.graph.contains(target) {
            return None;
        }
        if source == target {
            return Some(vec![start.canonical_id.clone()]);
        }

        // node -> predecessor on the first path that reached it
        let mut parents: HashMap<&EntityId, &EntityId> = HashMap::new();
        let mut queue: VecDeque<(&EntityId, usize)> = VecDeque::new();
        queue.push_back((&start.canonical_id, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_hops {
                continue;
            }

            for (next, _) in self.graph.out_edges(current.as_str()) {
                if next == &start.canonical_id || parents.contains_key(next) {
                    continue;
                }
                parents.insert(next, current);

                if next.as_str() == target {
                    return Some(Self::unwind(&parents, next));
                }
                queue.push_back((next, depth + 1));
            }
        }

        debug!(source, target, max_hops, "No bounded path");
        None
    }

    /// Maximal cliques of the undirected graph containing every pattern node.
    ///
    /// An empty pattern matches every maximal clique; a pattern naming an
    /// unknown entity matches nothing. Results are sorted.
    pub fn subgraph_match(&self, pattern: &BTreeSet<EntityId>) -> Vec<BTreeSet<EntityId>> {
        let mut required = BTreeSet::new();
        for id in pattern {
            match self.graph.position(id.as_str()) {
                Some(pos) => {
                    required.insert(pos);
                }
                None => return Vec::new(),
            }
        }

        let cliques = maximal_cliques(&self.graph.undirected_adjacency());
        let mut matches: Vec<BTreeSet<EntityId>> = cliques
            .into_iter()
            .filter(|clique| clique.is_superset(&required))
            .map(|clique| {
                clique
                    .into_iter()
                    .filter_map(|pos| self.graph.node_at(pos))
                    .map(|node| node.canonical_id.clone())
                    .collect()
            })
            .collect();

        matches.sort();
        matches
    }

    /// One relation type per directed edge `source -> target`, in insertion order
    pub fn infer_relation(&self, source: &str, target: &str) -> Vec<String> {
        self.graph
            .relations_between(source, target)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Reasoning trace linking the first and last answer entities
    pub fn explain_answer(&self, answer_entities: &[EntityId]) -> ReasoningTrace {
        let (Some(first), Some(last)) = (answer_entities.first(), answer_entities.last()) else {
            return ReasoningTrace::NotApplicable;
        };
        if answer_entities.len() < 2 {
            return ReasoningTrace::NotApplicable;
        }

        match self.find_path(first.as_str(), last.as_str(), self.max_path_hops) {
            Some(entities) => {
                let relations = entities
                    .windows(2)
                    .map(|pair| {
                        self.graph
                            .relations_between(pair[0].as_str(), pair[1].as_str())
                            .first()
                            .map(|r| r.to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                ReasoningTrace::Path { entities, relations }
            }
            None => ReasoningTrace::NoPath,
        }
    }

    fn unwind(parents: &HashMap<&EntityId, &EntityId>, end: &EntityId) -> Vec<EntityId> {
        let mut path = vec![end.clone()];
        let mut current = end;
        while let Some(&prev) = parents.get(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<EntityId> {
        items.iter().map(|s| EntityId::from(*s)).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<EntityId> {
        items.iter().map(|s| EntityId::from(*s)).collect()
    }

    fn chain() -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "ACQUIRED");
        graph.add_relation("B", "C", "CO_OCCUR");
        graph
    }

    #[test]
    fn test_path_within_bound() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("A", "C", 3), Some(ids(&["A", "B", "C"])));
        assert_eq!(reasoner.find_path("A", "C", 2), Some(ids(&["A", "B", "C"])));
    }

    #[test]
    fn test_path_beyond_bound() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("A", "C", 1), None);
    }

    #[test]
    fn test_path_respects_direction() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("C", "A", 5), None);
    }

    #[test]
    fn test_missing_endpoint() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("A", "nonexistent", 3), None);
        assert_eq!(reasoner.find_path("nonexistent", "A", 3), None);
    }

    #[test]
    fn test_path_to_self() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("B", "B", 0), Some(ids(&["B"])));
    }

    #[test]
    fn test_shortest_path_preferred() {
        let mut graph = chain();
        graph.add_relation("A", "C", "SHORTCUT");
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.find_path("A", "C", 3), Some(ids(&["A", "C"])));
    }

    #[test]
    fn test_relation_multiplicity() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "ACQUIRED");
        graph.add_relation("A", "B", "MERGED");
        graph.add_relation("A", "B", "ACQUIRED");
        let reasoner = GraphReasoner::new(&graph);

        assert_eq!(
            reasoner.infer_relation("A", "B"),
            vec!["ACQUIRED", "MERGED", "ACQUIRED"]
        );
        assert!(reasoner.infer_relation("B", "A").is_empty());
        assert!(reasoner.infer_relation("A", "Z").is_empty());
    }

    #[test]
    fn test_subgraph_match_ignores_direction() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "R");
        graph.add_relation("C", "A", "R");
        graph.add_relation("B", "C", "R");
        graph.add_relation("C", "D", "R");
        let reasoner = GraphReasoner::new(&graph);

        assert_eq!(reasoner.subgraph_match(&set(&["A"])), vec![set(&["A", "B", "C"])]);
        assert_eq!(
            reasoner.subgraph_match(&set(&["C"])),
            vec![set(&["A", "B", "C"]), set(&["C", "D"])]
        );
        assert_eq!(reasoner.subgraph_match(&set(&[])).len(), 2);
        assert!(reasoner.subgraph_match(&set(&["A", "D"])).is_empty());
        assert!(reasoner.subgraph_match(&set(&["missing"])).is_empty());
    }

    #[test]
    fn test_explain_requires_two_entities() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);
        assert_eq!(reasoner.explain_answer(&ids(&["A"])), ReasoningTrace::NotApplicable);
        assert_eq!(reasoner.explain_answer(&[]), ReasoningTrace::NotApplicable);
    }

    #[test]
    fn test_explain_renders_path_with_relations() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph);

        let trace = reasoner.explain_answer(&ids(&["A", "unrelated", "C"]));

        assert_eq!(
            trace,
            ReasoningTrace::Path {
                entities: ids(&["A", "B", "C"]),
                relations: vec!["ACQUIRED".to_string(), "CO_OCCUR".to_string()],
            }
        );
        assert_eq!(trace.to_string(), "Path: A -[ACQUIRED]-> B -[CO_OCCUR]-> C");
    }

    #[test]
    fn test_explain_no_path() {
        let graph = chain();
        let reasoner = GraphReasoner::new(&graph).with_max_path_hops(1);
        assert_eq!(reasoner.explain_answer(&ids(&["A", "C"])), ReasoningTrace::NoPath);
        assert_eq!(reasoner.explain_answer(&ids(&["A", "ghost"])), ReasoningTrace::NoPath);
    }
}
