//! Rule engine: ranks candidate jobs under one dispatching rule.
//!
//! Evaluation is sequential: primary score first, then the rule's ID
//! tie-breaker. The result is a strict total order over distinct jobs.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use super::{DispatchingRule, SchedulingContext};
use crate::graph::TaskGraph;
use crate::models::Job;

/// How equal scores are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Smaller job ID first.
    #[default]
    AscendingId,
    /// Larger job ID first.
    DescendingId,
}

impl TieBreaker {
    fn compare(&self, a: &Job, b: &Job) -> Ordering {
        match self {
            TieBreaker::AscendingId => a.id.cmp(&b.id),
            TieBreaker::DescendingId => b.id.cmp(&a.id),
        }
    }
}

/// Ranks jobs by a dispatching rule.
///
/// # Example
/// ```
/// use rt_schedule::dispatching::{rules, RuleEngine, SchedulingContext};
/// use rt_schedule::models::Job;
///
/// let engine = RuleEngine::new(rules::Edf);
/// let jobs = [Job::new(1, 5).with_deadline(30), Job::new(2, 5).with_deadline(10)];
/// let ctx = SchedulingContext::at_time(0);
/// assert!(engine.compare(&jobs[1], &jobs[0], &ctx).is_lt());
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rule: Arc<dyn DispatchingRule>,
}

impl RuleEngine {
    /// Creates an engine for a rule.
    pub fn new<R: DispatchingRule + 'static>(rule: R) -> Self {
        Self {
            rule: Arc::new(rule),
        }
    }

    /// Name of the underlying rule.
    pub fn rule_name(&self) -> &'static str {
        self.rule.name()
    }

    /// Whether the underlying rule preempts.
    pub fn is_preemptive(&self) -> bool {
        self.rule.is_preemptive()
    }

    /// Whether waiting jobs' scores change with time.
    pub fn is_time_dependent(&self) -> bool {
        self.rule.is_time_dependent()
    }

    /// Orders two jobs: `Less` means `a` is more urgent.
    pub fn compare(&self, a: &Job, b: &Job, context: &SchedulingContext) -> Ordering {
        let score_a = self.rule.evaluate(a, context);
        let score_b = self.rule.evaluate(b, context);
        score_a
            .cmp(&score_b)
            .then_with(|| self.rule.tie_breaker().compare(a, b))
    }

    /// Sorts job indices, most urgent first.
    pub fn sort_indices(
        &self,
        candidates: &mut [usize],
        graph: &TaskGraph,
        context: &SchedulingContext,
    ) {
        candidates.sort_by(|&a, &b| self.compare(graph.job(a), graph.job(b), context));
    }

    /// Returns the most urgent candidate.
    pub fn select_best(
        &self,
        candidates: &[usize],
        graph: &TaskGraph,
        context: &SchedulingContext,
    ) -> Option<usize> {
        let best = candidates
            .iter()
            .copied()
            .min_by(|&a, &b| self.compare(graph.job(a), graph.job(b), context))?;
        trace!(
            rule = self.rule.name(),
            job = graph.job(best).id,
            score = self.rule.evaluate(graph.job(best), context),
            candidates = candidates.len(),
            "selected"
        );
        Some(best)
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rule", &self.rule.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::JobId;

    fn graph(jobs: Vec<Job>) -> TaskGraph {
        TaskGraph::build(&jobs, &[]).unwrap()
    }

    fn ids(graph: &TaskGraph, indices: &[usize]) -> Vec<JobId> {
        indices.iter().map(|&i| graph.job(i).id).collect()
    }

    #[test]
    fn test_edf_ordering() {
        let g = graph(vec![
            Job::new(1, 10).with_deadline(15),
            Job::new(2, 20).with_deadline(100),
            Job::new(3, 30).with_deadline(50),
        ]);
        let engine = RuleEngine::new(rules::Edf);
        let mut order = vec![0, 1, 2];
        engine.sort_indices(&mut order, &g, &SchedulingContext::at_time(0));
        assert_eq!(ids(&g, &order), vec![1, 3, 2]);
    }

    #[test]
    fn test_ascending_id_tie_break() {
        let g = graph(vec![
            Job::new(7, 10).with_deadline(50),
            Job::new(3, 10).with_deadline(50),
        ]);
        let engine = RuleEngine::new(rules::Edf);
        let best = engine
            .select_best(&[0, 1], &g, &SchedulingContext::at_time(0))
            .unwrap();
        assert_eq!(g.job(best).id, 3);
    }

    #[test]
    fn test_ldf_descending_tie_break() {
        let g = graph(vec![
            Job::new(1, 10).with_deadline(80),
            Job::new(2, 10).with_deadline(80),
            Job::new(3, 10).with_deadline(20),
        ]);
        let engine = RuleEngine::new(rules::Ldf);
        let mut order = vec![0, 1, 2];
        engine.sort_indices(&mut order, &g, &SchedulingContext::at_time(0));
        assert_eq!(ids(&g, &order), vec![2, 1, 3]);
    }

    #[test]
    fn test_laxity_depends_on_context() {
        let g = graph(vec![
            Job::new(1, 10).with_deadline(30), // laxity 20 at t=0
            Job::new(2, 25).with_deadline(40), // laxity 15 at t=0
        ]);
        let engine = RuleEngine::new(rules::LeastLaxity);
        let ctx = SchedulingContext::at_time(0);
        assert_eq!(engine.select_best(&[0, 1], &g, &ctx), Some(1));

        // Job 2 has run for 20 units: laxity 40 - 20 - 5 = 15; job 1: 30 - 20 - 10 = 0
        let ctx = SchedulingContext::at_time(20).with_remaining_work(2, 5);
        assert_eq!(engine.select_best(&[0, 1], &g, &ctx), Some(0));
    }

    #[test]
    fn test_empty_candidates() {
        let g = graph(vec![]);
        let engine = RuleEngine::new(rules::Rms);
        assert!(engine
            .select_best(&[], &g, &SchedulingContext::at_time(0))
            .is_none());
    }

    #[test]
    fn test_engine_flags() {
        assert!(!RuleEngine::new(rules::Edf).is_preemptive());
        assert!(RuleEngine::new(rules::Rms).is_preemptive());
        assert!(RuleEngine::new(rules::LeastLaxity).is_time_dependent());
        assert_eq!(format!("{:?}", RuleEngine::new(rules::Ldf)), "RuleEngine { rule: \"LDF\" }");
    }
}
