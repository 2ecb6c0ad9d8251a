//! Schedule (solution) model.
//!
//! A schedule is the committed timeline of a run: one or more entries per
//! job in commit order, the jobs that missed their deadline, and a label
//! naming the policy and topology that produced it.
//!
//! # Wire Format
//! ```json
//! {
//!   "schedule": [{"task_id": 0, "node_id": 0, "start_time": 0, "end_time": 10, "deadline": 15}],
//!   "missed_deadlines": [],
//!   "name": "EDF Single-node"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{JobId, NodeId};

/// A complete schedule produced by one run.
///
/// Immutable once returned; only read accessors are provided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Committed entries, in commit order.
    pub schedule: Vec<ScheduleEntry>,
    /// Jobs that completed after their deadline, in completion order.
    pub missed_deadlines: Vec<JobId>,
    /// Policy/topology label (e.g. "EDF Multinode").
    pub name: String,
}

/// A job (or a preemption segment of a job) placed on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Scheduled job.
    pub task_id: JobId,
    /// Executing node.
    pub node_id: NodeId,
    /// Segment start (inclusive).
    pub start_time: i64,
    /// Segment end (exclusive).
    pub end_time: i64,
    /// The job's absolute deadline.
    pub deadline: i64,
}

impl ScheduleEntry {
    /// Creates a new entry.
    pub fn new(
        task_id: JobId,
        node_id: NodeId,
        start_time: i64,
        end_time: i64,
        deadline: i64,
    ) -> Self {
        Self {
            task_id,
            node_id,
            start_time,
            end_time,
            deadline,
        }
    }

    /// Segment length.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Whether two entries share any instant.
    #[inline]
    pub fn overlaps(&self, other: &ScheduleEntry) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

impl Schedule {
    /// Whether every job met its deadline.
    pub fn is_feasible(&self) -> bool {
        self.missed_deadlines.is_empty()
    }

    /// Makespan: latest end time across all entries.
    pub fn makespan(&self) -> i64 {
        self.schedule.iter().map(|e| e.end_time).max().unwrap_or(0)
    }

    /// Entries of a job, in commit order.
    pub fn entries_for_job(&self, job: JobId) -> Vec<&ScheduleEntry> {
        self.schedule.iter().filter(|e| e.task_id == job).collect()
    }

    /// Entries on a node, in commit order.
    pub fn entries_for_node(&self, node: NodeId) -> Vec<&ScheduleEntry> {
        self.schedule.iter().filter(|e| e.node_id == node).collect()
    }

    /// First start of a job.
    pub fn start_time(&self, job: JobId) -> Option<i64> {
        self.entries_for_job(job).iter().map(|e| e.start_time).min()
    }

    /// Completion time of a job (end of its last segment).
    pub fn completion_time(&self, job: JobId) -> Option<i64> {
        self.entries_for_job(job).iter().map(|e| e.end_time).max()
    }

    /// Node that executed a job (its first segment's node).
    pub fn node_of(&self, job: JobId) -> Option<NodeId> {
        self.schedule.iter().find(|e| e.task_id == job).map(|e| e.node_id)
    }

    /// Busy fraction of each node over the makespan.
    pub fn node_utilization(&self) -> HashMap<NodeId, f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return HashMap::new();
        }

        let mut busy: HashMap<NodeId, i64> = HashMap::new();
        for e in &self.schedule {
            *busy.entry(e.node_id).or_insert(0) += e.duration();
        }

        busy.into_iter()
            .map(|(id, b)| (id, b as f64 / horizon as f64))
            .collect()
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.schedule.len()
    }
}
