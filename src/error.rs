//! Error kinds for schedule construction.
//!
//! Every variant is fatal: the run is aborted and no partial schedule is
//! returned. Deadline misses are not errors; they are reported in
//! [`Schedule::missed_deadlines`](crate::models::Schedule::missed_deadlines).

use thiserror::Error;

use crate::models::{JobId, NodeId};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Fatal scheduling errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The dependency graph contains a cycle.
    #[error("cyclic dependency detected involving job {job}")]
    CyclicDependency { job: JobId },

    /// A message or constraint names a job that is not in the job set.
    #[error("unknown job {job} referenced by {context}")]
    UnknownJobReference { job: JobId, context: String },

    /// A job lacks an attribute the chosen policy needs (period, deadline).
    #[error("job {job} cannot be scheduled with {policy}: {reason}")]
    InfeasiblePolicyInput {
        job: JobId,
        policy: &'static str,
        reason: String,
    },

    /// No compute node can ever host the job.
    #[error("no node can host job {job}: {reason}")]
    UnschedulableNode { job: JobId, reason: String },

    /// Structurally invalid input (duplicate ids, non-positive times, bad config).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The dispatcher could not make progress although jobs remain.
    #[error("dispatch stalled at t={time} with {pending} unfinished jobs (node {node:?})")]
    Stalled {
        time: i64,
        pending: usize,
        node: Option<NodeId>,
    },
}

impl ScheduleError {
    pub(crate) fn unknown_job(job: JobId, context: impl Into<String>) -> Self {
        Self::UnknownJobReference {
            job,
            context: context.into(),
        }
    }

    pub(crate) fn unschedulable(job: JobId, reason: impl Into<String>) -> Self {
        Self::UnschedulableNode {
            job,
            reason: reason.into(),
        }
    }
}
