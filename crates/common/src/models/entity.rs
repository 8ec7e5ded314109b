//! Graph entities and relations

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Label given to nodes that only appear as edge endpoints
pub const DEFAULT_ENTITY_LABEL: &str = "Entity";

/// Relation type used when an edge carries no type
pub const DEFAULT_RELATION_TYPE: &str = "RELATED_TO";

/// Canonical entity identifier, the graph's vertex key
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A canonicalized real-world entity.
///
/// Identity is the canonical id alone; aliases only serve surface matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNode {
    #[serde(rename = "id")]
    pub canonical_id: EntityId,

    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default)]
    pub aliases: BTreeSet<String>,
}

fn default_label() -> String {
    DEFAULT_ENTITY_LABEL.to_string()
}

impl EntityNode {
    pub fn new(id: impl Into<EntityId>, label: impl Into<String>) -> Self {
        Self {
            canonical_id: id.into(),
            label: label.into(),
            aliases: BTreeSet::new(),
        }
    }

    /// Node created for an edge endpoint that was never declared
    pub fn placeholder(id: impl Into<EntityId>) -> Self {
        Self::new(id, DEFAULT_ENTITY_LABEL)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    /// Canonical id followed by every alias
    pub fn surface_forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Directed, typed edge. Parallel edges are allowed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub source: EntityId,

    pub target: EntityId,

    #[serde(rename = "type", default = "default_relation_type")]
    pub relation_type: String,
}

fn default_relation_type() -> String {
    DEFAULT_RELATION_TYPE.to_string()
}

impl RelationEdge {
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation_type: relation_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_entity_id_borrow_lookup() {
        let mut map: HashMap<EntityId, usize> = HashMap::new();
        map.insert(EntityId::from("Apple"), 1);
        assert_eq!(map.get("Apple"), Some(&1));
        assert_eq!(map.get("apple"), None);
    }

    #[test]
    fn test_node_deserialize_defaults() {
        let node: EntityNode = serde_json::from_str(r#"{"id": "Q312"}"#).unwrap();
        assert_eq!(node.canonical_id.as_str(), "Q312");
        assert_eq!(node.label, DEFAULT_ENTITY_LABEL);
        assert!(node.aliases.is_empty());
    }

    #[test]
    fn test_edge_type_defaults() {
        let edge: RelationEdge =
            serde_json::from_str(r#"{"source": "A", "target": "B"}"#).unwrap();
        assert_eq!(edge.relation_type, DEFAULT_RELATION_TYPE);
    }

    #[test]
    fn test_surface_forms_include_aliases() {
        let node = EntityNode::new("Q312", "ORG").with_alias("Apple Inc.");
        let forms: Vec<&str> = node.surface_forms().collect();
        assert_eq!(forms, vec!["Q312", "Apple Inc."]);
    }
}
