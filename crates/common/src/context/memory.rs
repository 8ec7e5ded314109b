//! Reasoning Memory - Ordered log of retrieval steps
//!
//! Steps are appended in evaluation order and never edited. The only ways a
//! step leaves memory are `clear` and, under a windowed policy, eviction of
//! the oldest step once the window is full.

use crate::config::MemoryConfig;
use crate::metrics;
use crate::models::ReasoningStep;
use std::collections::VecDeque;

/// Capacity policy for a memory instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryPolicy {
    /// Keep every step until `clear`
    #[default]
    Unbounded,
    /// Keep the most recent `max_steps` steps
    Window { max_steps: usize },
}

impl From<&MemoryConfig> for MemoryPolicy {
    fn from(config: &MemoryConfig) -> Self {
        match config.max_steps {
            Some(max_steps) => MemoryPolicy::Window { max_steps },
            None => MemoryPolicy::Unbounded,
        }
    }
}

/// Per-session reasoning memory
#[derive(Debug, Default)]
pub struct ReasoningMemory {
    steps: VecDeque<ReasoningStep>,
    policy: MemoryPolicy,
    evicted: u64,
}

impl ReasoningMemory {
    /// Create an unbounded memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory with an explicit capacity policy
    pub fn with_policy(policy: MemoryPolicy) -> Self {
        Self {
            steps: VecDeque::new(),
            policy,
            evicted: 0,
        }
    }

    /// Append a step
    pub fn add(&mut self, step: ReasoningStep) {
        if let MemoryPolicy::Window { max_steps } = self.policy {
            // A zero window keeps nothing at all.
            if max_steps == 0 {
                self.evicted += 1;
                metrics::record_eviction();
                return;
            }
            while self.steps.len() >= max_steps {
                self.steps.pop_front();
                self.evicted += 1;
                metrics::record_eviction();
            }
        }
        self.steps.push_back(step);
    }

    /// Snapshot of all steps in evaluation order
    pub fn get_all(&self) -> Vec<ReasoningStep> {
        self.steps.iter().cloned().collect()
    }

    /// Most recently appended step
    pub fn last(&self) -> Option<ReasoningStep> {
        self.steps.back().cloned()
    }

    /// Drop every step
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn policy(&self) -> MemoryPolicy {
        self.policy
    }

    /// Steps dropped by the window since creation
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}
