//! Graph reasoning
//!
//! Bounded path search, clique-based subgraph matching, relation inference
//! and answer explanation over an `EntityGraph` snapshot.

mod cliques;
mod matcher;
mod reasoner;

pub use cliques::maximal_cliques;
pub use matcher::{AnswerExplanation, EntityMatcher, Suggestion};
pub use reasoner::{GraphReasoner, DEFAULT_MAX_PATH_HOPS};
