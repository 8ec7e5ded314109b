//! Solver - Drives planning, retrieval and memory for one question
//!
//! Sub-questions are answered in plan order and each step is committed to
//! memory in that same order. With parallel retrieval enabled the
//! retrievals overlap, but the commit order does not change.

use futures::future::join_all;
use kagforge_common::config::AppConfig;
use kagforge_common::context::{MemoryPolicy, Planner, ReasoningMemory};
use kagforge_common::metrics::SolveMetrics;
use kagforge_common::models::{ReasoningStep, SolvedStep, SubQuestion};
use kagforge_search::retrieval::Retriever;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// One question-answering session
pub struct Solver {
    planner: Planner,
    memory: ReasoningMemory,
    session_id: Uuid,
    parallel: bool,
}

impl Solver {
    /// Create a sequential solver with unbounded memory
    pub fn new() -> Self {
        Self {
            planner: Planner::new(),
            memory: ReasoningMemory::new(),
            session_id: Uuid::new_v4(),
            parallel: false,
        }
    }

    /// Create a solver from the memory and solver sections
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_memory_policy(MemoryPolicy::from(&config.memory))
            .with_parallel_retrieval(config.solver.parallel_retrieval)
    }

    pub fn with_memory_policy(mut self, policy: MemoryPolicy) -> Self {
        self.memory = ReasoningMemory::with_policy(policy);
        self
    }

    /// Overlap sub-question retrievals; commits stay in plan order
    pub fn with_parallel_retrieval(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn memory(&self) -> &ReasoningMemory {
        &self.memory
    }

    /// Start a new session: memory is cleared and a fresh id assigned
    pub fn reset(&mut self) {
        self.memory.clear();
        self.session_id = Uuid::new_v4();
        debug!(session_id = %self.session_id, "Solver reset");
    }

    /// Gather evidence for every sub-question of `question`.
    ///
    /// An empty plan yields an empty result.
    #[instrument(skip_all, fields(session_id = %self.session_id, parallel = self.parallel))]
    pub async fn solve(
        &mut self,
        question: &str,
        retriever: &dyn Retriever,
        k: usize,
        hops: usize,
    ) -> Vec<SolvedStep> {
        let plan = self.planner.plan(question);
        info!(sub_questions = plan.len(), k, hops, "Solving question");

        let metrics = SolveMetrics::start(self.parallel);
        let mut solved = Vec::with_capacity(plan.len());

        if self.parallel {
            let contexts =
                join_all(plan.iter().map(|sq| retriever.retrieve(&sq.text, k, hops))).await;
            for (sub_question, context) in plan.into_iter().zip(contexts) {
                solved.push(self.commit(sub_question, context));
            }
        } else {
            for sub_question in plan {
                let context = retriever.retrieve(&sub_question.text, k, hops).await;
                solved.push(self.commit(sub_question, context));
            }
        }

        metrics.finish(solved.len());
        info!(steps = solved.len(), memory = self.memory.len(), "Solve complete");
        solved
    }

    fn commit(&mut self, sub_question: SubQuestion, context: Vec<String>) -> SolvedStep {
        debug!(order = sub_question.order, passages = context.len(), "Step committed");
        let step = SolvedStep {
            sub_question: sub_question.text.clone(),
            context: context.clone(),
        };
        self.memory.add(ReasoningStep::new(sub_question, context));
        step
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}
