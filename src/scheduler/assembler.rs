//! Final schedule assembly.

use tracing::debug;

use super::DeadlineMonitor;
use crate::models::{Schedule, ScheduleEntry};

/// Accumulates committed entries and builds the immutable [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleAssembler {
    name: String,
    entries: Vec<ScheduleEntry>,
}

impl ScheduleAssembler {
    /// Starts a schedule with the given policy/topology label.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry in commit order.
    pub fn commit(&mut self, entry: ScheduleEntry) {
        debug!(
            job = entry.task_id,
            node = entry.node_id,
            start = entry.start_time,
            end = entry.end_time,
            "committed"
        );
        self.entries.push(entry);
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the schedule.
    pub fn finish(self, monitor: DeadlineMonitor) -> Schedule {
        Schedule {
            schedule: self.entries,
            missed_deadlines: monitor.into_missed(),
            name: self.name,
        }
    }
}
