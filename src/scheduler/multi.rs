//! Multi-node dispatcher.
//!
//! # Algorithm
//!
//! Event-driven list scheduling over the compute nodes of a platform, with
//! one shared [`ReadinessTracker`] and one busy segment per node.
//!
//! At each decision instant:
//! 1. Jobs whose segment ends now complete; successors may become ready.
//! 2. Candidates (ready jobs, plus running jobs for preemptive policies) are
//!    ranked by the policy. LDF ranks by position in its reverse-constructed
//!    sequence.
//! 3. In rank order, each job claims a compute node allowed by its affinity
//!    on which all its inputs have already arrived, preferring an idle node,
//!    then the earliest finish time, then the smallest node ID. Jobs that
//!    already ran are bound to their first node. A job whose inputs are
//!    still in flight holds the free node where it can start first, so
//!    lower-ranked jobs cannot take it in the meantime.
//! 4. The clock advances to the next completion, release, input arrival or
//!    (time-dependent policies) quantum boundary.
//!
//! Input arrival on a node is `completion(p) + delay(node(p), node, size)`
//! for every predecessor `p`. The delay is the cheapest route over the
//! platform links, or zero in no-delay mode.
//!
//! # Reference
//! Sih & Lee (1993), "A Compile-Time Scheduling Heuristic for
//! Interconnection-Constrained Heterogeneous Processor Architectures"

use tracing::{debug, info, trace};

use super::ldf::reverse_sequence;
use super::single::entry_deadline;
use super::{DeadlineMonitor, ReadinessTracker, Router, ScheduleAssembler};
use crate::config::{DelayMode, DispatchConfig};
use crate::dispatching::{Policy, RuleEngine, SchedulingContext};
use crate::error::{Result, ScheduleError};
use crate::graph::TaskGraph;
use crate::models::{Job, Node, NodeId, Platform, Schedule, ScheduleEntry};
use crate::validation::{first_error, validate_platform};

/// Ordering of candidates at a decision instant.
#[derive(Debug, Clone)]
pub enum Ranking {
    /// Rank by a dispatching rule.
    Rule(RuleEngine),
    /// Rank by a precomputed position per job index.
    Sequence(Vec<usize>),
}

impl Ranking {
    /// Ranking used by a policy on a graph.
    pub fn for_policy(policy: Policy, graph: &TaskGraph) -> Self {
        let engine = policy.engine();
        match policy {
            Policy::Ldf => {
                let mut position = vec![0; graph.len()];
                for (pos, idx) in reverse_sequence(graph, &engine).into_iter().enumerate() {
                    position[idx] = pos;
                }
                Ranking::Sequence(position)
            }
            _ => Ranking::Rule(engine),
        }
    }

    /// Sorts candidates, most urgent first.
    pub fn order(
        &self,
        candidates: &mut [usize],
        graph: &TaskGraph,
        context: &SchedulingContext,
    ) {
        match self {
            Ranking::Rule(engine) => engine.sort_indices(candidates, graph, context),
            Ranking::Sequence(position) => candidates.sort_by_key(|&idx| position[idx]),
        }
    }
}

/// A job holding a node since `start`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    job: usize,
    start: i64,
}

/// What a node does from the current decision instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Claim {
    /// Nobody wants it.
    Free,
    /// Runs this job.
    Run(usize),
    /// Reserved for a job whose inputs are in flight; the occupant, if any, keeps running.
    Hold,
}

/// Dispatches one task graph on the compute nodes of a platform.
#[derive(Debug)]
pub struct MultiNodeDispatcher<'a> {
    graph: &'a TaskGraph,
    platform: &'a Platform,
    policy: Policy,
    config: &'a DispatchConfig,
}

impl<'a> MultiNodeDispatcher<'a> {
    /// Creates a dispatcher. Inputs are checked by [`run`](Self::run).
    pub fn new(
        graph: &'a TaskGraph,
        platform: &'a Platform,
        policy: Policy,
        config: &'a DispatchConfig,
    ) -> Self {
        Self {
            graph,
            platform,
            policy,
            config,
        }
    }

    /// Produces the schedule.
    ///
    /// # Errors
    /// - `InvalidInput` for a bad configuration or platform
    /// - `InfeasiblePolicyInput` when a job lacks the attribute the policy ranks by
    /// - `UnschedulableNode` when no allowed compute node exists for a job, or
    ///   its inputs cannot reach any of them
    pub fn run(&self) -> Result<Schedule> {
        let graph = self.graph;
        self.config.validate()?;
        first_error(validate_platform(self.platform, graph.jobs()))?;
        self.policy.check_graph(graph)?;

        let slots = self.platform.compute_nodes();
        for job in graph.jobs() {
            if !slots.iter().any(|node| job.allows_node(node.id)) {
                return Err(ScheduleError::unschedulable(
                    job.id,
                    "no compute node satisfies its affinity",
                ));
            }
        }

        info!(
            policy = self.policy.name(),
            jobs = graph.len(),
            nodes = slots.len(),
            delay_mode = ?self.config.delay_mode,
            "multi-node dispatch started"
        );

        let label = self.policy.multinode_label(self.config.delay_mode);
        let ranking = Ranking::for_policy(self.policy, graph);
        let schedule = self.dispatch(&slots, &ranking, label)?;

        info!(
            entries = schedule.schedule.len(),
            missed = schedule.missed_deadlines.len(),
            makespan = schedule.makespan(),
            "multi-node dispatch finished"
        );
        Ok(schedule)
    }

    fn dispatch(&self, slots: &[&Node], ranking: &Ranking, label: String) -> Result<Schedule> {
        let graph = self.graph;
        let preemptive = self.policy.is_preemptive();
        let time_dependent = matches!(ranking, Ranking::Rule(engine) if engine.is_time_dependent());

        let mut tracker = ReadinessTracker::new(graph);
        let mut monitor = DeadlineMonitor::new();
        let mut assembler = ScheduleAssembler::new(label);
        let mut router = Router::new(self.platform);
        let delay_mode = self.config.delay_mode;
        let mut delay = |from: usize, to: usize, size: i64| match delay_mode {
            DelayMode::NoDelay => Some(0),
            DelayMode::WithDelay => router.delay(slots[from].id, slots[to].id, size),
        };

        // Work left at the start of the current segment, in node time units.
        let mut remaining: Vec<Option<i64>> = vec![None; graph.len()];
        let mut busy: Vec<Option<Segment>> = vec![None; slots.len()];
        let mut ctx = SchedulingContext::at_time(self.config.start_time);
        let mut now = self.config.start_time;

        loop {
            for (slot, node) in slots.iter().enumerate() {
                let Some(seg) = busy[slot] else { continue };
                let end = seg.start + remaining[seg.job].unwrap_or(0);
                if end > now {
                    continue;
                }
                let job = graph.job(seg.job);
                if preemptive {
                    assembler.commit(entry(job, node, seg.start, end));
                }
                tracker.complete(graph, seg.job, end);
                monitor.observe(job, end);
                remaining[seg.job] = Some(0);
                busy[slot] = None;
            }
            if tracker.is_finished() {
                break;
            }

            tracker.release_until(graph, now);
            ctx.current_time = now;
            for seg in busy.iter().flatten() {
                let left = remaining[seg.job].unwrap_or(0) - (now - seg.start);
                ctx.remaining_work.insert(graph.job(seg.job).id, left);
            }

            let mut candidates = tracker.ready();
            if preemptive {
                candidates.extend(busy.iter().flatten().map(|seg| seg.job));
            }
            ranking.order(&mut candidates, graph, &ctx);

            // Running jobs keep their node unless a preemptive policy takes it.
            let mut claimed: Vec<Claim> = busy
                .iter()
                .map(|seg| match seg {
                    Some(seg) if !preemptive => Claim::Run(seg.job),
                    _ => Claim::Free,
                })
                .collect();
            let mut next_arrival: Option<i64> = None;
            for &idx in &candidates {
                if preemptive {
                    if let Some(slot) = tracker.placement(idx) {
                        if claimed[slot] == Claim::Free {
                            claimed[slot] = Claim::Run(idx);
                        }
                        continue;
                    }
                }

                let job = graph.job(idx);
                // (occupied, finish, node id, slot)
                let mut best: Option<(bool, i64, NodeId, usize)> = None;
                let mut options: Vec<(usize, i64)> = Vec::new();
                for (slot, node) in slots.iter().enumerate() {
                    if !job.allows_node(node.id) {
                        continue;
                    }
                    let Some(arrival) = tracker.inputs_arrival(graph, idx, slot, &mut delay) else {
                        continue;
                    };
                    options.push((slot, arrival));
                    if claimed[slot] != Claim::Free {
                        continue;
                    }
                    if arrival > now {
                        next_arrival = Some(next_arrival.map_or(arrival, |t| t.min(arrival)));
                        continue;
                    }
                    let occupied = busy[slot].is_some();
                    let key = (occupied, now + node.execution_time(job.wcet), node.id, slot);
                    if best.map_or(true, |b| key < b) {
                        best = Some(key);
                    }
                }
                if options.is_empty() {
                    return Err(ScheduleError::unschedulable(
                        job.id,
                        "inputs cannot reach any allowed compute node",
                    ));
                }
                match best {
                    Some((.., slot)) => claimed[slot] = Claim::Run(idx),
                    None => {
                        // Inputs are still in flight: keep lower-ranked jobs off
                        // the node where this one can start first.
                        let held = earliest_start(
                            job, slots, &options, &claimed, &busy, &remaining, now,
                        );
                        if let Some(slot) = held.filter(|&slot| claimed[slot] == Claim::Free) {
                            trace!(job = job.id, node = slots[slot].id, now, "node held");
                            claimed[slot] = Claim::Hold;
                        }
                    }
                }
            }

            for (slot, node) in slots.iter().enumerate() {
                let current = busy[slot].map(|seg| seg.job);
                let target = match claimed[slot] {
                    Claim::Run(idx) => Some(idx),
                    Claim::Hold => current,
                    Claim::Free => None,
                };
                if current == target {
                    continue;
                }
                if let Some(seg) = busy[slot].take() {
                    let job = graph.job(seg.job);
                    debug!(job = job.id, node = node.id, now, "preempted");
                    if now > seg.start {
                        assembler.commit(entry(job, node, seg.start, now));
                    }
                    let left = remaining[seg.job].unwrap_or(0) - (now - seg.start);
                    remaining[seg.job] = Some(left);
                    ctx.remaining_work.insert(job.id, left);
                    tracker.preempt(seg.job);
                }
                if let Some(idx) = target {
                    let job = graph.job(idx);
                    let left = *remaining[idx].get_or_insert_with(|| node.execution_time(job.wcet));
                    tracker.start(idx, slot);
                    busy[slot] = Some(Segment { job: idx, start: now });
                    if !preemptive {
                        assembler.commit(entry(job, node, now, now + left));
                    }
                }
            }

            let mut next = next_arrival;
            let mut consider = |t: i64| next = Some(next.map_or(t, |n: i64| n.min(t)));
            for seg in busy.iter().flatten() {
                consider(seg.start + remaining[seg.job].unwrap_or(0));
            }
            if let Some(release) = tracker.next_release(graph, now) {
                consider(release);
            }
            if time_dependent && busy.iter().any(Option::is_some) {
                consider(now + self.config.quantum);
            }

            match next {
                Some(t) if t > now => now = t,
                _ => {
                    return Err(ScheduleError::Stalled {
                        time: now,
                        pending: tracker.unfinished(),
                        node: None,
                    })
                }
            }
        }

        Ok(assembler.finish(monitor))
    }
}

/// Slot where `job` could start first, as `max(node free, inputs arrived)`.
///
/// Ties go to the earlier finish, then the smaller node ID. Nodes already
/// taken at this instant by a more urgent job are skipped.
fn earliest_start(
    job: &Job,
    slots: &[&Node],
    options: &[(usize, i64)],
    claimed: &[Claim],
    busy: &[Option<Segment>],
    remaining: &[Option<i64>],
    now: i64,
) -> Option<usize> {
    options
        .iter()
        .filter_map(|&(slot, arrival)| {
            let free_at = match (claimed[slot], busy[slot]) {
                (Claim::Free, _) => now,
                (Claim::Run(idx), Some(seg)) if seg.job == idx => {
                    seg.start + remaining[idx].unwrap_or(0)
                }
                _ => return None,
            };
            let start = free_at.max(arrival);
            let node = slots[slot];
            Some((start, start + node.execution_time(job.wcet), node.id, slot))
        })
        .min()
        .map(|(.., slot)| slot)
}

fn entry(job: &Job, node: &Node, start: i64, end: i64) -> ScheduleEntry {
    ScheduleEntry::new(job.id, node.id, start, end, entry_deadline(job))
}
