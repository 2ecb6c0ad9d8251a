//! Job model.
//!
//! A job is a unit of real-time work: it has a worst-case execution time,
//! a release time, and either an absolute deadline or a period from which
//! an implicit deadline is derived.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Stable job identifier. Also the final tie-break key of every policy.
pub type JobId = u64;

/// A job to be scheduled.
///
/// Jobs are immutable for the duration of a run. Remaining execution time
/// for preemptive policies is tracked by the dispatcher, never here.
///
/// # Time Representation
/// All times are integer time units relative to the scheduling epoch (t=0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Worst-case execution time on a node of speed 1.0.
    #[serde(alias = "execution_time")]
    pub wcet: i64,
    /// Earliest time the job may start.
    #[serde(default, alias = "release")]
    pub release_time: i64,
    /// Absolute deadline. `None` = derived from `period`.
    #[serde(default)]
    pub deadline: Option<i64>,
    /// Activation period (required by rate-monotonic scheduling).
    #[serde(default)]
    pub period: Option<i64>,
    /// Nodes this job may run on. Empty = any compute node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_affinity: Vec<NodeId>,
}

impl Job {
    /// Creates a job with the given ID and execution time.
    pub fn new(id: JobId, wcet: i64) -> Self {
        Self {
            id,
            wcet,
            release_time: 0,
            deadline: None,
            period: None,
            node_affinity: Vec::new(),
        }
    }

    /// Sets the absolute deadline.
    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the release time.
    pub fn with_release_time(mut self, release_time: i64) -> Self {
        self.release_time = release_time;
        self
    }

    /// Sets the period.
    pub fn with_period(mut self, period: i64) -> Self {
        self.period = Some(period);
        self
    }

    /// Restricts the job to the given nodes.
    pub fn with_affinity(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.node_affinity = nodes.into_iter().collect();
        self
    }

    /// Absolute deadline: explicit, or `release_time + period`.
    pub fn absolute_deadline(&self) -> Option<i64> {
        self.deadline
            .or_else(|| self.period.map(|p| self.release_time + p))
    }

    /// Whether the job may be placed on `node`.
    pub fn allows_node(&self, node: NodeId) -> bool {
        self.node_affinity.is_empty() || self.node_affinity.contains(&node)
    }
}
