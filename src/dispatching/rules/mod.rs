//! Built-in real-time dispatching rules.
//!
//! | Rule | Score | Tie-break | Preemptive |
//! |------|-------|-----------|------------|
//! | EDF | absolute deadline | ascending ID | no |
//! | LDF | negated deadline | descending ID | no |
//! | RMS | period | ascending ID | yes |
//! | LL | deadline − now − remaining | ascending ID | yes |
//!
//! # Score Convention
//! All rules return lower scores for higher priority jobs. Jobs missing the
//! attribute a rule needs are rejected before dispatch, so the fallbacks
//! below only matter for direct callers.

use super::{DispatchingRule, RuleScore, SchedulingContext, TieBreaker};
use crate::models::Job;

/// Earliest Deadline First.
///
/// Prioritizes jobs with earlier absolute deadlines.
///
/// # Reference
/// Jackson (1955): optimal for minimizing maximum lateness on a single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edf;

impl DispatchingRule for Edf {
    fn name(&self) -> &'static str {
        "EDF"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.absolute_deadline().unwrap_or(i64::MAX)
    }

    fn description(&self) -> &'static str {
        "Earliest Deadline First"
    }
}

/// Latest Deadline First.
///
/// Selects the job with the latest deadline. Used when building a sequence
/// end-to-start: among jobs whose successors are all placed, the one with
/// the latest deadline goes last.
///
/// # Reference
/// Lawler (1973), "Optimal Sequencing of a Single Machine Subject to
/// Precedence Constraints"
#[derive(Debug, Clone, Copy)]
pub struct Ldf;

impl DispatchingRule for Ldf {
    fn name(&self) -> &'static str {
        "LDF"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.absolute_deadline().map(|d| -d).unwrap_or(i64::MAX)
    }

    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::DescendingId
    }

    fn description(&self) -> &'static str {
        "Latest Deadline First"
    }
}

/// Rate-Monotonic Scheduling.
///
/// Static priority: shorter period = higher priority.
#[derive(Debug, Clone, Copy)]
pub struct Rms;

impl DispatchingRule for Rms {
    fn name(&self) -> &'static str {
        "RMS"
    }

    fn evaluate(&self, job: &Job, _context: &SchedulingContext) -> RuleScore {
        job.period.unwrap_or(i64::MAX)
    }

    fn is_preemptive(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "Rate-Monotonic Scheduling"
    }
}

/// Least Laxity.
///
/// Laxity = deadline − current_time − remaining_work. The job with the
/// least slack runs first. Waiting jobs lose laxity as time passes while the
/// running job's laxity stays constant, so the order must be re-evaluated
/// every quantum.
#[derive(Debug, Clone, Copy)]
pub struct LeastLaxity;

impl DispatchingRule for LeastLaxity {
    fn name(&self) -> &'static str {
        "LL"
    }

    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore {
        match job.absolute_deadline() {
            Some(deadline) => deadline - context.current_time - context.remaining(job),
            None => i64::MAX,
        }
    }

    fn is_preemptive(&self) -> bool {
        true
    }

    fn is_time_dependent(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "Least Laxity"
    }
}
