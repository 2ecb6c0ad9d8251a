//! Per-run readiness state.
//!
//! Tracks, for every job, how many predecessors are still unfinished and
//! where the job sits in its lifecycle:
//!
//! ```text
//! Blocked ──(preds done ∧ now ≥ release)──▶ Ready ──▶ Running ──▶ Completed
//!                                             ▲          │
//!                                             └─preempt──┘
//! ```
//!
//! Placement is recorded as a dispatcher slot index so multi-node runs can
//! compute when a job's inputs reach a given node.

use tracing::trace;

use crate::graph::TaskGraph;

/// Lifecycle state of a job within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Waiting on predecessors or release time.
    Blocked,
    /// Eligible for dispatch.
    Ready,
    /// Holding a node.
    Running,
    /// Finished; terminal.
    Completed,
}

/// Readiness tracker for one scheduling run.
#[derive(Debug, Clone)]
pub struct ReadinessTracker {
    pending: Vec<usize>,
    state: Vec<JobState>,
    completion: Vec<Option<i64>>,
    placement: Vec<Option<usize>>,
    completed: usize,
}

impl ReadinessTracker {
    /// All jobs start Blocked with their full predecessor count.
    pub fn new(graph: &TaskGraph) -> Self {
        let n = graph.len();
        Self {
            pending: (0..n).map(|i| graph.predecessors(i).len()).collect(),
            state: vec![JobState::Blocked; n],
            completion: vec![None; n],
            placement: vec![None; n],
            completed: 0,
        }
    }

    /// Current state of a job.
    #[inline]
    pub fn state(&self, idx: usize) -> JobState {
        self.state[idx]
    }

    /// Whether every job has completed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.completed == self.state.len()
    }

    /// Number of jobs not yet completed.
    #[inline]
    pub fn unfinished(&self) -> usize {
        self.state.len() - self.completed
    }

    /// Completion time of a finished job.
    #[inline]
    pub fn completion_time(&self, idx: usize) -> Option<i64> {
        self.completion[idx]
    }

    /// Slot a job was first dispatched to.
    #[inline]
    pub fn placement(&self, idx: usize) -> Option<usize> {
        self.placement[idx]
    }

    /// Promotes blocked jobs whose predecessors are done and whose release has passed.
    pub fn release_until(&mut self, graph: &TaskGraph, now: i64) {
        for idx in 0..self.state.len() {
            if self.state[idx] == JobState::Blocked
                && self.pending[idx] == 0
                && graph.job(idx).release_time <= now
            {
                trace!(job = graph.job(idx).id, now, "ready");
                self.state[idx] = JobState::Ready;
            }
        }
    }

    /// Ready jobs in ascending index (= job ID) order.
    pub fn ready(&self) -> Vec<usize> {
        self.with_state(JobState::Ready)
    }

    /// Running jobs in ascending index order.
    pub fn running(&self) -> Vec<usize> {
        self.with_state(JobState::Running)
    }

    fn with_state(&self, state: JobState) -> Vec<usize> {
        self.state
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == state)
            .map(|(i, _)| i)
            .collect()
    }

    /// Earliest release strictly after `now` among jobs whose predecessors are done.
    pub fn next_release(&self, graph: &TaskGraph, now: i64) -> Option<i64> {
        (0..self.state.len())
            .filter(|&i| self.state[i] == JobState::Blocked && self.pending[i] == 0)
            .map(|i| graph.job(i).release_time)
            .filter(|&r| r > now)
            .min()
    }

    /// Ready → Running on `slot`. The first slot a job runs on is kept as its placement.
    pub fn start(&mut self, idx: usize, slot: usize) {
        debug_assert_eq!(self.state[idx], JobState::Ready, "start of non-ready job");
        self.state[idx] = JobState::Running;
        self.placement[idx].get_or_insert(slot);
    }

    /// Running → Ready.
    pub fn preempt(&mut self, idx: usize) {
        debug_assert_eq!(self.state[idx], JobState::Running, "preempt of idle job");
        self.state[idx] = JobState::Ready;
    }

    /// Running → Completed at `time`; successors lose one pending predecessor.
    pub fn complete(&mut self, graph: &TaskGraph, idx: usize, time: i64) {
        debug_assert_eq!(self.state[idx], JobState::Running, "completion of idle job");
        self.state[idx] = JobState::Completed;
        self.completion[idx] = Some(time);
        self.completed += 1;
        for edge in graph.successors(idx) {
            self.pending[edge.peer] -= 1;
        }
        trace!(job = graph.job(idx).id, time, "completed");
    }

    /// Earliest instant all inputs of `idx` are available on `slot`.
    ///
    /// `delay(from_slot, to_slot, size)` gives the transfer delay between two
    /// different slots, or `None` when no route exists. Returns `None` if a
    /// predecessor is unfinished or unreachable. Never earlier than the
    /// job's release time.
    pub fn inputs_arrival<F>(
        &self,
        graph: &TaskGraph,
        idx: usize,
        slot: usize,
        mut delay: F,
    ) -> Option<i64>
    where
        F: FnMut(usize, usize, i64) -> Option<i64>,
    {
        let mut arrival = graph.job(idx).release_time;
        for edge in graph.predecessors(idx) {
            let done = self.completion[edge.peer]?;
            let from = self.placement[edge.peer]?;
            let transfer = if from == slot {
                0
            } else {
                delay(from, slot, edge.size)?
            };
            arrival = arrival.max(done + transfer);
        }
        Some(arrival)
    }
}
