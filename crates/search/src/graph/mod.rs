//! Entity graph representation
//!
//! In-memory directed multigraph of canonical entities. Parallel edges between
//! the same ordered pair are kept, with their insertion order.

mod loader;

pub use loader::{load_graph, GraphDocument};

use kagforge_common::errors::{AppError, Result};
use kagforge_common::models::{EntityId, EntityNode, RelationEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Directed multigraph keyed by canonical entity id
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    graph: DiGraph<EntityNode, String>,

    /// canonical id -> node index
    index: HashMap<EntityId, NodeIndex>,
}

impl EntityGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, failing if its id is already present
    pub fn add_node(&mut self, node: EntityNode) -> Result<()> {
        if self.index.contains_key(&node.canonical_id) {
            return Err(AppError::DuplicateEntity {
                id: node.canonical_id.to_string(),
            });
        }
        self.insert(node);
        Ok(())
    }

    /// Add a node or merge its aliases into the existing one.
    ///
    /// The first label seen for an id wins, except over the placeholder label.
    pub fn upsert_node(&mut self, node: EntityNode) {
        match self.index.get(&node.canonical_id) {
            Some(&idx) => {
                let existing = &mut self.graph[idx];
                if existing.label == kagforge_common::models::DEFAULT_ENTITY_LABEL {
                    existing.label = node.label;
                }
                existing.aliases.extend(node.aliases);
            }
            None => {
                self.insert(node);
            }
        }
    }

    /// Add a directed edge.
    ///
    /// Endpoints that were never declared are created as placeholder nodes.
    pub fn add_edge(&mut self, edge: RelationEdge) {
        let source = self.ensure_node(&edge.source);
        let target = self.ensure_node(&edge.target);
        self.graph.add_edge(source, target, edge.relation_type);
    }

    /// Shorthand for `add_edge(RelationEdge::new(..))`
    pub fn add_relation(&mut self, source: &str, target: &str, relation_type: &str) {
        self.add_edge(RelationEdge::new(source, target, relation_type));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&EntityNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.graph.node_weights()
    }

    /// All canonical ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.graph.node_weights().map(|n| &n.canonical_id)
    }

    /// All edges in insertion order
    pub fn edges(&self) -> Vec<RelationEdge> {
        self.graph
            .edge_references()
            .map(|e| RelationEdge {
                source: self.graph[e.source()].canonical_id.clone(),
                target: self.graph[e.target()].canonical_id.clone(),
                relation_type: e.weight().clone(),
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing edges of a node as `(target, relation type)`, in insertion order.
    /// Empty for unknown ids.
    pub fn out_edges(&self, id: &str) -> Vec<(&EntityId, &str)> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        // petgraph walks adjacency newest-first; edge indices follow insertion.
        edges.sort_by_key(|e| e.id().index());

        edges
            .into_iter()
            .map(|e| (&self.graph[e.target()].canonical_id, e.weight().as_str()))
            .collect()
    }

    /// Relation types of every edge `source -> target`, in insertion order
    pub fn relations_between(&self, source: &str, target: &str) -> Vec<&str> {
        let (Some(&s), Some(&t)) = (self.index.get(source), self.index.get(target)) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self.graph.edges_connecting(s, t).collect();
        edges.sort_by_key(|e| e.id().index());
        edges.into_iter().map(|e| e.weight().as_str()).collect()
    }

    /// Undirected adjacency by node position, ignoring self loops and parallel edges
    pub fn undirected_adjacency(&self) -> Vec<BTreeSet<usize>> {
        let mut adjacency = vec![BTreeSet::new(); self.graph.node_count()];
        for edge in self.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            if a != b {
                adjacency[a].insert(b);
                adjacency[b].insert(a);
            }
        }
        adjacency
    }

    /// Node at a position as used by `undirected_adjacency`
    pub fn node_at(&self, position: usize) -> Option<&EntityNode> {
        self.graph.node_weight(NodeIndex::new(position))
    }

    /// Position of a node as used by `undirected_adjacency`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|idx| idx.index())
    }

    /// Top nodes by total degree (in + out), ties by id
    pub fn degree_centrality(&self, top_n: usize) -> Vec<(EntityId, usize)> {
        let mut scores: Vec<(EntityId, usize)> = self
            .graph
            .node_indices()
            .map(|idx| {
                let degree = self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self.graph.edges_directed(idx, Direction::Incoming).count();
                (self.graph[idx].canonical_id.clone(), degree)
            })
            .collect();

        scores.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scores.truncate(top_n);
        scores
    }

    fn insert(&mut self, node: EntityNode) -> NodeIndex {
        let id = node.canonical_id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    fn ensure_node(&mut self, id: &EntityId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        warn!(entity = %id, "Edge endpoint not declared as a node, adding placeholder");
        self.insert(EntityNode::placeholder(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_construction() {
        let mut graph = EntityGraph::new();
        graph.add_node(EntityNode::new("A", "ORG")).unwrap();
        graph.add_node(EntityNode::new("B", "ORG")).unwrap();
        graph.add_relation("A", "B", "ACQUIRED");
        graph.add_relation("B", "C", "CO_OCCUR");

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains("C"));
        assert_eq!(graph.node("C").unwrap().label, "Entity");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = EntityGraph::new();
        graph.add_node(EntityNode::new("A", "ORG")).unwrap();
        let err = graph.add_node(EntityNode::new("A", "PERSON")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateEntity { .. }));
    }

    #[test]
    fn test_upsert_merges_aliases() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "CO_OCCUR");
        graph.upsert_node(EntityNode::new("A", "ORG").with_alias("Alpha"));
        graph.upsert_node(EntityNode::new("A", "PERSON").with_alias("Alfa"));

        let node = graph.node("A").unwrap();
        assert_eq!(node.label, "ORG");
        assert_eq!(node.aliases.len(), 2);
    }

    #[test]
    fn test_parallel_edges_kept_in_order() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "ACQUIRED");
        graph.add_relation("A", "B", "CO_OCCUR");
        graph.add_relation("A", "B", "ACQUIRED");
        graph.add_relation("B", "A", "SUED");

        assert_eq!(
            graph.relations_between("A", "B"),
            vec!["ACQUIRED", "CO_OCCUR", "ACQUIRED"]
        );
        assert_eq!(graph.relations_between("B", "A"), vec!["SUED"]);
        assert!(graph.relations_between("A", "missing").is_empty());
        assert_eq!(graph.edges().len(), 4);
    }

    #[test]
    fn test_out_edges_insertion_order() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "R1");
        graph.add_relation("A", "C", "R2");
        graph.add_relation("A", "D", "R3");

        let targets: Vec<&str> = graph.out_edges("A").iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(targets, vec!["B", "C", "D"]);
        assert!(graph.out_edges("missing").is_empty());
    }

    #[test]
    fn test_undirected_adjacency_ignores_direction_and_loops() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "R");
        graph.add_relation("B", "A", "R");
        graph.add_relation("A", "A", "SELF");

        let adjacency = graph.undirected_adjacency();
        let a = graph.position("A").unwrap();
        let b = graph.position("B").unwrap();
        assert_eq!(adjacency[a], BTreeSet::from([b]));
        assert_eq!(adjacency[b], BTreeSet::from([a]));
    }

    #[test]
    fn test_degree_centrality() {
        let mut graph = EntityGraph::new();
        graph.add_relation("A", "B", "R");
        graph.add_relation("C", "B", "R");
        graph.add_relation("B", "D", "R");

        let top = graph.degree_centrality(2);
        assert_eq!(top[0], (EntityId::from("B"), 3));
        assert_eq!(top[1].1, 1);
    }
}
