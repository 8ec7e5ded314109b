//! KAGForge Search Library
//!
//! Knowledge access for the reasoning engine:
//! - Similarity index trait and an in-memory TF-IDF index
//! - Entity graph (directed multigraph) and its JSON loader
//! - Multi-hop retrieval over the hybrid index
//! - Graph reasoning and answer entity matching

pub mod graph;
pub mod index;
pub mod reasoning;
pub mod retrieval;

pub use graph::{load_graph, EntityGraph, GraphDocument};
pub use index::{load_chunks_dir, SimilarityIndex, TfIdfIndex};
pub use reasoning::{AnswerExplanation, EntityMatcher, GraphReasoner};
pub use retrieval::{HybridIndex, MultiHopRetriever, Retriever};
