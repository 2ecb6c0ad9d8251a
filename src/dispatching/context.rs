//! Scheduling context for dispatching rule evaluation.

use std::collections::HashMap;

use crate::models::{Job, JobId};

/// Runtime scheduling state passed to dispatching rules.
///
/// Contains the simulated clock and the remaining execution time of jobs
/// that have already run partially. Owned by one dispatcher run.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Current simulation time.
    pub current_time: i64,
    /// Remaining execution time per partially executed job.
    pub remaining_work: HashMap<JobId, i64>,
}

impl SchedulingContext {
    /// Creates a context at the given time.
    pub fn at_time(current_time: i64) -> Self {
        Self {
            current_time,
            ..Default::default()
        }
    }

    /// Sets remaining work for a job.
    pub fn with_remaining_work(mut self, job: JobId, remaining: i64) -> Self {
        self.remaining_work.insert(job, remaining);
        self
    }

    /// Remaining execution time of a job; its WCET if it has not run yet.
    pub fn remaining(&self, job: &Job) -> i64 {
        self.remaining_work.get(&job.id).copied().unwrap_or(job.wcet)
    }
}
