//! Precedence graph construction.
//!
//! Turns a job set plus its messages into a validated DAG. Jobs are stored
//! in an arena sorted by ID, so a dense index doubles as the ascending-ID
//! ordering used by every tie-break. Edges are kept as adjacency lists in
//! both directions together with their payload size.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::models::{Application, Job, JobId, Message};
use crate::validation::{first_error, validate_input};

/// One direction of a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Index of the job at the other end.
    pub peer: usize,
    /// Payload size carried by the message.
    pub size: i64,
}

/// A validated, acyclic precedence graph.
///
/// Read-only after construction; may be shared across concurrent runs.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    jobs: Vec<Job>,
    index: HashMap<JobId, usize>,
    preds: Vec<Vec<Edge>>,
    succs: Vec<Vec<Edge>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Grey,
    Black,
}

impl TaskGraph {
    /// Builds the graph from jobs and messages.
    ///
    /// # Errors
    /// - `UnknownJobReference` if a message names a job absent from `jobs`
    /// - `InvalidInput` for duplicate IDs or non-positive times
    /// - `CyclicDependency` if the messages form a cycle
    pub fn build(jobs: &[Job], messages: &[Message]) -> Result<Self> {
        first_error(validate_input(jobs, messages))?;

        let mut sorted: Vec<Job> = jobs.to_vec();
        sorted.sort_by_key(|j| j.id);
        let index: HashMap<JobId, usize> =
            sorted.iter().enumerate().map(|(i, j)| (j.id, i)).collect();

        let mut preds = vec![Vec::new(); sorted.len()];
        let mut succs = vec![Vec::new(); sorted.len()];
        for msg in messages {
            let (Some(&p), Some(&c)) = (index.get(&msg.producer), index.get(&msg.consumer)) else {
                let missing = if index.contains_key(&msg.producer) {
                    msg.consumer
                } else {
                    msg.producer
                };
                return Err(ScheduleError::unknown_job(missing, "message"));
            };
            succs[p].push(Edge {
                peer: c,
                size: msg.size,
            });
            preds[c].push(Edge {
                peer: p,
                size: msg.size,
            });
        }

        let graph = Self {
            jobs: sorted,
            index,
            preds,
            succs,
        };

        if let Some(idx) = graph.find_cycle() {
            return Err(ScheduleError::CyclicDependency {
                job: graph.jobs[idx].id,
            });
        }

        debug!(jobs = graph.len(), edges = messages.len(), "task graph built");
        Ok(graph)
    }

    /// Builds the graph of an application document.
    pub fn from_application(app: &Application) -> Result<Self> {
        Self::build(&app.tasks, &app.messages)
    }

    /// Number of jobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the graph has no jobs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Job at a dense index.
    #[inline]
    pub fn job(&self, idx: usize) -> &Job {
        &self.jobs[idx]
    }

    /// All jobs in ascending ID order.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Dense index of a job ID.
    pub fn index_of(&self, id: JobId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Incoming edges of a job.
    #[inline]
    pub fn predecessors(&self, idx: usize) -> &[Edge] {
        &self.preds[idx]
    }

    /// Outgoing edges of a job.
    #[inline]
    pub fn successors(&self, idx: usize) -> &[Edge] {
        &self.succs[idx]
    }

    /// A topological order, smallest job ID first among available jobs.
    pub fn topological_order(&self) -> Vec<usize> {
        let mut indegree: Vec<usize> = self.preds.iter().map(Vec::len).collect();
        let mut heap: BinaryHeap<Reverse<usize>> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(idx)) = heap.pop() {
            order.push(idx);
            for edge in &self.succs[idx] {
                indegree[edge.peer] -= 1;
                if indegree[edge.peer] == 0 {
                    heap.push(Reverse(edge.peer));
                }
            }
        }
        order
    }

    /// Three-colour DFS. Returns a job lying on a cycle, if any.
    fn find_cycle(&self) -> Option<usize> {
        let mut marks = vec![Mark::White; self.len()];
        // Explicit stack of (node, next successor position) to avoid deep recursion.
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.len() {
            if marks[root] != Mark::White {
                continue;
            }
            marks[root] = Mark::Grey;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (node, pos) = *top;
                if let Some(edge) = self.succs[node].get(pos) {
                    top.1 += 1;
                    match marks[edge.peer] {
                        Mark::Grey => return Some(edge.peer), // back edge
                        Mark::White => {
                            marks[edge.peer] = Mark::Grey;
                            stack.push((edge.peer, 0));
                        }
                        Mark::Black => {}
                    }
                } else {
                    marks[node] = Mark::Black;
                    stack.pop();
                }
            }
        }
        None
    }
}
