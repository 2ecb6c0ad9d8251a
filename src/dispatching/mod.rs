//! Priority policies for real-time dispatch.
//!
//! Each policy is a total order over the ready set: a primary score
//! (lower = more urgent) followed by an explicit job-ID tie-break, so that
//! identical inputs always produce identical decisions.
//!
//! # Usage
//!
//! ```
//! use rt_schedule::dispatching::{Policy, SchedulingContext};
//!
//! let engine = Policy::Edf.engine();
//! let context = SchedulingContext::at_time(0);
//! assert_eq!(engine.rule_name(), "EDF");
//! # let _ = context;
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Lawler (1973), "Optimal Sequencing of a Single Machine Subject to
//!   Precedence Constraints"
//! - Mok (1983), "Fundamental Design Problems of Distributed Systems for the
//!   Hard-Real-Time Environment" (least laxity)

mod context;
mod engine;
mod policy;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{RuleEngine, TieBreaker};
pub use policy::Policy;

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = i64;

/// A dispatching rule that evaluates job priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Ties are resolved by
/// [`tie_breaker`](DispatchingRule::tie_breaker), never left to iteration order.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "EDF", "RMS").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a job given the current scheduling context.
    fn evaluate(&self, job: &Job, context: &SchedulingContext) -> RuleScore;

    /// Order applied between jobs with equal scores.
    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::AscendingId
    }

    /// Whether a running job may be interrupted by a more urgent one.
    fn is_preemptive(&self) -> bool {
        false
    }

    /// Whether scores of waiting jobs drift with time (requires per-quantum re-evaluation).
    fn is_time_dependent(&self) -> bool {
        false
    }

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
