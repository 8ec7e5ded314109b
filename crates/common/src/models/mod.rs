//! Core data model
//!
//! Value types shared by the planner, retriever, reasoner and solver

mod chunk;
mod entity;
mod reasoning;

pub use chunk::Chunk;
pub use entity::{EntityId, EntityNode, RelationEdge, DEFAULT_ENTITY_LABEL, DEFAULT_RELATION_TYPE};
pub use reasoning::{ReasoningStep, ReasoningTrace, SolvedStep, SubQuestion};
