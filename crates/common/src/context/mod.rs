//! Context Engine Core Components
//!
//! The session-local half of the reasoning engine:
//! - Question decomposition
//! - Ordered reasoning memory

mod memory;
mod planner;

pub use memory::{MemoryPolicy, ReasoningMemory};
pub use planner::Planner;
