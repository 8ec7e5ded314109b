//! Planning and reasoning records

use super::entity::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One atomic question produced by the planner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub text: String,

    /// Zero-based evaluation order within its plan
    pub order: usize,
}

impl SubQuestion {
    pub fn new(text: impl Into<String>, order: usize) -> Self {
        Self {
            text: text.into(),
            order,
        }
    }
}

/// Evidence gathered for a single sub-question.
///
/// Appended to reasoning memory once and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub sub_question: SubQuestion,

    /// Passages in retrieval order
    pub context_chunks: Vec<String>,

    pub recorded_at: DateTime<Utc>,
}

impl ReasoningStep {
    pub fn new(sub_question: SubQuestion, context_chunks: Vec<String>) -> Self {
        Self {
            sub_question,
            context_chunks,
            recorded_at: Utc::now(),
        }
    }
}

/// Solver output for one sub-question, handed to answer synthesis
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedStep {
    pub sub_question: String,
    pub context: Vec<String>,
}

/// Explanation linking the entities of an answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReasoningTrace {
    /// Directed chain from the first to the last answer entity.
    /// `relations[i]` labels the edge `entities[i] -> entities[i + 1]`.
    Path {
        entities: Vec<EntityId>,
        relations: Vec<String>,
    },

    /// Both entities were checked and no bounded path connects them
    NoPath,

    /// Fewer than two answer entities, nothing to connect
    NotApplicable,
}

impl ReasoningTrace {
    pub fn is_path(&self) -> bool {
        matches!(self, ReasoningTrace::Path { .. })
    }

    /// Entities along the path, empty for the other outcomes
    pub fn entities(&self) -> &[EntityId] {
        match self {
            ReasoningTrace::Path { entities, .. } => entities,
            _ => &[],
        }
    }
}

impl fmt::Display for ReasoningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasoningTrace::Path { entities, relations } => {
                f.write_str("Path: ")?;
                for (i, entity) in entities.iter().enumerate() {
                    if i > 0 {
                        match relations.get(i - 1) {
                            Some(rel) => write!(f, " -[{}]-> ", rel)?,
                            None => f.write_str(" -> ")?,
                        }
                    }
                    write!(f, "{}", entity)?;
                }
                Ok(())
            }
            ReasoningTrace::NoPath => f.write_str("No path found."),
            ReasoningTrace::NotApplicable => f.write_str("No reasoning trace."),
        }
    }
}
