//! Single-node dispatcher.
//!
//! # Algorithm
//!
//! - **Non-preemptive** (EDF): discrete-event loop. At each decision instant
//!   the most urgent ready job runs to completion; when nothing is ready the
//!   clock jumps to the next release.
//! - **Sequence** (LDF): the reverse-constructed sequence is placed forward,
//!   each job starting at `max(clock, release)`.
//! - **Preemptive** (RMS, LL): time-stepped loop. The running job advances
//!   to its completion, the next release, or the next quantum boundary
//!   (time-dependent rules only), whichever comes first. A more urgent job
//!   preempts and the interrupted segment becomes its own entry.
//!
//! # Complexity
//! O(e · n) where e = number of events and n = jobs.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use tracing::{debug, info};

use super::ldf::reverse_sequence;
use super::{DeadlineMonitor, ReadinessTracker, ScheduleAssembler};
use crate::config::DispatchConfig;
use crate::dispatching::{Policy, RuleEngine, SchedulingContext};
use crate::error::{Result, ScheduleError};
use crate::graph::TaskGraph;
use crate::models::{Job, Node, Schedule, ScheduleEntry};

const SLOT: usize = 0;

/// Dispatches one task graph on one node.
#[derive(Debug)]
pub struct SingleNodeDispatcher<'a> {
    graph: &'a TaskGraph,
    policy: Policy,
    config: &'a DispatchConfig,
}

/// Mutable per-run state.
struct Run<'a> {
    node: &'a Node,
    tracker: ReadinessTracker,
    monitor: DeadlineMonitor,
    assembler: ScheduleAssembler,
}

impl Run<'_> {
    fn commit(&mut self, job: &Job, start: i64, end: i64) {
        let entry = ScheduleEntry::new(job.id, self.node.id, start, end, entry_deadline(job));
        self.assembler.commit(entry);
    }

    fn finish(self) -> Schedule {
        self.assembler.finish(self.monitor)
    }
}

impl<'a> SingleNodeDispatcher<'a> {
    /// Creates a dispatcher. Inputs are checked by [`run`](Self::run).
    pub fn new(graph: &'a TaskGraph, policy: Policy, config: &'a DispatchConfig) -> Self {
        Self {
            graph,
            policy,
            config,
        }
    }

    /// Produces the schedule.
    ///
    /// # Errors
    /// `InvalidInput` for a bad configuration, `InfeasiblePolicyInput` when a
    /// job lacks the attribute the policy ranks by.
    pub fn run(&self) -> Result<Schedule> {
        self.config.validate()?;
        self.policy.check_graph(self.graph)?;

        let node = &self.config.single_node;
        info!(
            policy = self.policy.name(),
            jobs = self.graph.len(),
            node = node.id,
            "single-node dispatch started"
        );

        let mut run = Run {
            node,
            tracker: ReadinessTracker::new(self.graph),
            monitor: DeadlineMonitor::new(),
            assembler: ScheduleAssembler::new(self.policy.single_node_label()),
        };

        let engine = self.policy.engine();
        match self.policy {
            Policy::Ldf => self.run_sequence(&mut run, &engine),
            _ if engine.is_preemptive() => self.run_preemptive(&mut run, &engine)?,
            _ => self.run_non_preemptive(&mut run, &engine)?,
        }

        let schedule = run.finish();
        info!(
            entries = schedule.schedule.len(),
            missed = schedule.missed_deadlines.len(),
            makespan = schedule.makespan(),
            "single-node dispatch finished"
        );
        Ok(schedule)
    }

    fn run_non_preemptive(&self, run: &mut Run<'_>, engine: &RuleEngine) -> Result<()> {
        let graph = self.graph;
        let mut now = self.config.start_time;
        let mut ctx = SchedulingContext::at_time(now);
        run.tracker.release_until(graph, now);

        while !run.tracker.is_finished() {
            ctx.current_time = now;
            let ready = run.tracker.ready();
            let Some(idx) = engine.select_best(&ready, graph, &ctx) else {
                now = self.next_release(run, now)?;
                run.tracker.release_until(graph, now);
                continue;
            };

            let job = graph.job(idx);
            let end = now + run.node.execution_time(job.wcet);
            run.tracker.start(idx, SLOT);
            run.commit(job, now, end);
            run.tracker.complete(graph, idx, end);
            run.monitor.observe(job, end);

            now = end;
            run.tracker.release_until(graph, now);
        }
        Ok(())
    }

    fn run_sequence(&self, run: &mut Run<'_>, engine: &RuleEngine) {
        let graph = self.graph;
        let mut clock = self.config.start_time;

        for idx in reverse_sequence(graph, engine) {
            let job = graph.job(idx);
            let start = clock.max(job.release_time);
            let end = start + run.node.execution_time(job.wcet);
            // predecessors precede idx in the sequence, so it is ready at `start`
            run.tracker.release_until(graph, start);
            run.tracker.start(idx, SLOT);
            run.commit(job, start, end);
            run.tracker.complete(graph, idx, end);
            run.monitor.observe(job, end);
            clock = end;
        }
    }

    fn run_preemptive(&self, run: &mut Run<'_>, engine: &RuleEngine) -> Result<()> {
        let graph = self.graph;
        let mut remaining: Vec<i64> = graph
            .jobs()
            .iter()
            .map(|job| run.node.execution_time(job.wcet))
            .collect();
        let mut ctx = SchedulingContext::at_time(self.config.start_time);
        for (job, &left) in graph.jobs().iter().zip(&remaining) {
            ctx.remaining_work.insert(job.id, left);
        }

        let mut now = self.config.start_time;
        // (job index, segment start)
        let mut current: Option<(usize, i64)> = None;

        while !run.tracker.is_finished() {
            run.tracker.release_until(graph, now);
            ctx.current_time = now;

            let mut candidates = run.tracker.ready();
            candidates.extend(current.map(|(idx, _)| idx));
            let Some(best) = engine.select_best(&candidates, graph, &ctx) else {
                now = self.next_release(run, now)?;
                continue;
            };

            match current {
                Some((idx, _)) if idx == best => {}
                Some((idx, seg_start)) => {
                    debug!(job = graph.job(idx).id, by = graph.job(best).id, now, "preempted");
                    if now > seg_start {
                        run.commit(graph.job(idx), seg_start, now);
                    }
                    run.tracker.preempt(idx);
                    run.tracker.start(best, SLOT);
                    current = Some((best, now));
                }
                None => {
                    run.tracker.start(best, SLOT);
                    current = Some((best, now));
                }
            }

            let mut step = remaining[best];
            if let Some(release) = run.tracker.next_release(graph, now) {
                step = step.min(release - now);
            }
            if engine.is_time_dependent() {
                step = step.min(self.config.quantum);
            }

            now += step;
            remaining[best] -= step;
            ctx.remaining_work.insert(graph.job(best).id, remaining[best]);

            if remaining[best] == 0 {
                if let Some((_, seg_start)) = current.take() {
                    let job = graph.job(best);
                    run.commit(job, seg_start, now);
                    run.tracker.complete(graph, best, now);
                    run.monitor.observe(job, now);
                }
            }
        }
        Ok(())
    }

    fn next_release(&self, run: &Run<'_>, now: i64) -> Result<i64> {
        run.tracker
            .next_release(self.graph, now)
            .ok_or(ScheduleError::Stalled {
                time: now,
                pending: run.tracker.unfinished(),
                node: Some(run.node.id),
            })
    }
}

/// Deadline reported on entries. Policy checks guarantee one exists.
pub(crate) fn entry_deadline(job: &Job) -> i64 {
    job.absolute_deadline().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobId, Message};

    fn schedule(policy: Policy, jobs: Vec<Job>, messages: Vec<Message>) -> Schedule {
        let graph = TaskGraph::build(&jobs, &messages).unwrap();
        let config = DispatchConfig::default();
        SingleNodeDispatcher::new(&graph, policy, &config).run().unwrap()
    }

    fn spans(s: &Schedule) -> Vec<(JobId, i64, i64)> {
        s.schedule
            .iter()
            .map(|e| (e.task_id, e.start_time, e.end_time))
            .collect()
    }

    fn assert_no_overlap(s: &Schedule) {
        for (i, a) in s.schedule.iter().enumerate() {
            for b in &s.schedule[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    fn assert_durations(s: &Schedule, jobs: &[Job]) {
        for job in jobs {
            let total: i64 = s.entries_for_job(job.id).iter().map(|e| e.duration()).sum();
            assert_eq!(total, job.wcet, "job {}", job.id);
        }
    }

    #[test]
    fn test_edf_three_independent_jobs() {
        let s = schedule(
            Policy::Edf,
            vec![
                Job::new(1, 10).with_deadline(15),
                Job::new(2, 20).with_deadline(100),
                Job::new(3, 30).with_deadline(50),
            ],
            vec![],
        );
        assert_eq!(spans(&s), vec![(1, 0, 10), (3, 10, 40), (2, 40, 60)]);
        assert!(s.missed_deadlines.is_empty());
        assert_eq!(s.name, "EDF Single-node");
    }

    #[test]
    fn test_edf_respects_precedence_and_release() {
        let s = schedule(
            Policy::Edf,
            vec![
                Job::new(1, 5).with_deadline(100),
                Job::new(2, 5).with_deadline(10),
                Job::new(3, 5).with_deadline(20).with_release_time(30),
            ],
            vec![Message::new(1, 2)],
        );
        // 2 is more urgent but waits for 1; 3 is released later and leaves a gap.
        assert_eq!(spans(&s), vec![(1, 0, 5), (2, 5, 10), (3, 30, 35)]);
        assert_eq!(s.missed_deadlines, vec![3]);
    }

    #[test]
    fn test_hopeless_job_is_missed() {
        for policy in Policy::ALL {
            let s = schedule(
                policy,
                vec![Job::new(7, 50).with_deadline(30).with_period(30)],
                vec![],
            );
            assert_eq!(s.missed_deadlines, vec![7], "{policy}");
            assert_eq!(s.completion_time(7), Some(50));
        }
    }

    #[test]
    fn test_ldf_sequence_placed_forward() {
        let jobs = vec![
            Job::new(1, 5).with_deadline(30),
            Job::new(2, 5).with_deadline(10),
            Job::new(3, 5).with_deadline(40),
            Job::new(4, 5).with_deadline(12).with_release_time(12),
        ];
        let s = schedule(
            Policy::Ldf,
            jobs,
            vec![Message::new(1, 3), Message::new(2, 3)],
        );
        assert_eq!(
            spans(&s),
            vec![(2, 0, 5), (4, 12, 17), (1, 17, 22), (3, 22, 27)]
        );
        assert_eq!(s.missed_deadlines, vec![4]);
        assert_eq!(s.name, "LDF Single-node");
    }

    #[test]
    fn test_rms_preempts_longer_period() {
        let jobs = vec![
            Job::new(1, 10).with_period(100),
            Job::new(2, 4).with_period(20).with_release_time(3),
        ];
        let s = schedule(Policy::Rms, jobs.clone(), vec![]);
        assert_eq!(spans(&s), vec![(1, 0, 3), (2, 3, 7), (1, 7, 14)]);
        assert_no_overlap(&s);
        assert_durations(&s, &jobs);
        assert!(s.is_feasible());
    }

    #[test]
    fn test_ll_splits_and_preserves_work() {
        let jobs = vec![
            Job::new(1, 6).with_deadline(20),
            Job::new(2, 6).with_deadline(14),
            Job::new(3, 3).with_deadline(40).with_release_time(2),
        ];
        let s = schedule(Policy::Ll, jobs.clone(), vec![]);
        assert_no_overlap(&s);
        assert_durations(&s, &jobs);
        assert_eq!(s.makespan(), 15);
        assert!(s.is_feasible());
    }

    #[test]
    fn test_preemptive_respects_precedence() {
        let jobs = vec![
            Job::new(1, 4).with_period(50),
            Job::new(2, 4).with_period(10),
        ];
        let s = schedule(Policy::Rms, jobs, vec![Message::new(1, 2)]);
        assert_eq!(spans(&s), vec![(1, 0, 4), (2, 4, 8)]);
    }

    #[test]
    fn test_speed_scales_entries() {
        let graph = TaskGraph::build(&[Job::new(1, 10).with_deadline(100)], &[]).unwrap();
        let config = DispatchConfig::default().with_single_node(Node::compute(4).with_speed(4.0));
        let s = SingleNodeDispatcher::new(&graph, Policy::Edf, &config)
            .run()
            .unwrap();
        assert_eq!(s.schedule, vec![ScheduleEntry::new(1, 4, 0, 3, 100)]);
    }

    #[test]
    fn test_start_time_offsets_everything() {
        let graph = TaskGraph::build(&[Job::new(1, 10).with_deadline(100)], &[]).unwrap();
        let config = DispatchConfig::default().with_start_time(20);
        let s = SingleNodeDispatcher::new(&graph, Policy::Rms, &config).run();
        // RMS needs a period
        assert!(matches!(
            s,
            Err(ScheduleError::InfeasiblePolicyInput { job: 1, .. })
        ));
        let s = SingleNodeDispatcher::new(&graph, Policy::Edf, &config)
            .run()
            .unwrap();
        assert_eq!(s.start_time(1), Some(20));
    }

    #[test]
    fn test_missing_deadline_rejected() {
        let graph = TaskGraph::build(&[Job::new(1, 10)], &[]).unwrap();
        let config = DispatchConfig::default();
        for policy in [Policy::Edf, Policy::Ldf, Policy::Ll] {
            let err = SingleNodeDispatcher::new(&graph, policy, &config)
                .run()
                .unwrap_err();
            assert!(matches!(err, ScheduleError::InfeasiblePolicyInput { .. }));
        }
    }

    #[test]
    fn test_empty_graph() {
        let s = schedule(Policy::Ll, vec![], vec![]);
        assert!(s.schedule.is_empty());
        assert_eq!(s.name, "LL Single-node");
    }
}
