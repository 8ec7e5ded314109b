//! JSON graph documents
//!
//! The graph store is an external collaborator; this is the exchange format
//! the `context` binary reads a graph snapshot from.

use super::EntityGraph;
use kagforge_common::errors::{AppError, Result};
use kagforge_common::models::{EntityNode, RelationEdge};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Serialized graph snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<EntityNode>,

    #[serde(default)]
    pub edges: Vec<RelationEdge>,
}

impl GraphDocument {
    /// Build a graph; repeated node ids are merged rather than rejected
    pub fn into_graph(self) -> EntityGraph {
        let mut graph = EntityGraph::new();
        for node in self.nodes {
            graph.upsert_node(node);
        }
        for edge in self.edges {
            graph.add_edge(edge);
        }
        graph
    }
}

impl From<&EntityGraph> for GraphDocument {
    fn from(graph: &EntityGraph) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges(),
        }
    }
}

/// Load a graph snapshot from a JSON file
pub fn load_graph(path: impl AsRef<Path>) -> Result<EntityGraph> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AppError::NotFound {
            resource_type: "graph document".to_string(),
            id: path.display().to_string(),
        });
    }

    let raw = std::fs::read_to_string(path)?;
    let document: GraphDocument = serde_json::from_str(&raw)?;
    let graph = document.into_graph();

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Loaded entity graph"
    );

    Ok(graph)
}
