//! KAGForge Context Engine
//!
//! Question answering orchestration:
//! - Planning a question into ordered sub-questions
//! - Gathering multi-hop evidence per sub-question
//! - Recording each step in session memory

mod solver;

pub use solver::Solver;
