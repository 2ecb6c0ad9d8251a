//! Deadline miss detection.
//!
//! Misses are advisory: they are recorded and the run continues.

use tracing::warn;

use crate::models::{Job, JobId};

/// Records jobs that complete after their deadline.
#[derive(Debug, Clone, Default)]
pub struct DeadlineMonitor {
    missed: Vec<JobId>,
}

impl DeadlineMonitor {
    /// Creates an empty monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a completion. Returns `true` if the deadline was missed.
    pub fn observe(&mut self, job: &Job, completion: i64) -> bool {
        let Some(deadline) = job.absolute_deadline() else {
            return false;
        };
        if completion <= deadline {
            return false;
        }
        warn!(
            job = job.id,
            completion,
            deadline,
            lateness = completion - deadline,
            "deadline missed"
        );
        if !self.missed.contains(&job.id) {
            self.missed.push(job.id);
        }
        true
    }

    /// Missed jobs in completion order.
    pub fn missed(&self) -> &[JobId] {
        &self.missed
    }

    /// Consumes the monitor.
    pub fn into_missed(self) -> Vec<JobId> {
        self.missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_and_late() {
        let mut m = DeadlineMonitor::new();
        let job = Job::new(1, 10).with_deadline(30);
        assert!(!m.observe(&job, 30)); // completing exactly at the deadline is on time
        assert!(m.observe(&job, 31));
        assert_eq!(m.missed(), &[1]);
    }

    #[test]
    fn test_no_duplicates_and_order() {
        let mut m = DeadlineMonitor::new();
        let a = Job::new(5, 10).with_deadline(5);
        let b = Job::new(2, 10).with_period(4);
        m.observe(&a, 10);
        m.observe(&b, 20);
        m.observe(&a, 30);
        assert_eq!(m.into_missed(), vec![5, 2]);
    }

    #[test]
    fn test_job_without_deadline_never_misses() {
        let mut m = DeadlineMonitor::new();
        assert!(!m.observe(&Job::new(1, 10), 1_000));
        assert!(m.missed().is_empty());
    }
}
