//! Query Planner - Decomposes compound questions into sub-questions
//!
//! Splits on three literal boundary markers, case-insensitively:
//! - the coordinating conjunction "and"
//! - the sequencing marker "then"
//! - question marks
//!
//! This is a syntactic heuristic. It does not resolve pronouns or nested clauses.

use crate::models::SubQuestion;
use regex_lite::Regex;

/// Boundary markers. Words only match on word boundaries so "Anderson" stays whole.
const BOUNDARY_PATTERN: &str = r"(?i)\band\b|\bthen\b|\?";

/// Question planner
pub struct Planner {
    boundary: Regex,
}

impl Planner {
    /// Create a new planner
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time constant covered by tests.
            boundary: Regex::new(BOUNDARY_PATTERN).expect("boundary pattern is valid"),
        }
    }

    /// Decompose a question into ordered, trimmed, non-empty sub-questions
    pub fn plan(&self, question: &str) -> Vec<SubQuestion> {
        let plan: Vec<SubQuestion> = self
            .boundary
            .split(question)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .enumerate()
            .map(|(order, fragment)| SubQuestion::new(fragment, order))
            .collect();

        tracing::debug!(
            question_len = question.len(),
            sub_questions = plan.len(),
            "Planned question"
        );

        plan
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}
