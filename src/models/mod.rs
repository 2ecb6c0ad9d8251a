//! Scheduling domain models.
//!
//! Provides the input documents (jobs, messages, platform) and the output
//! schedule of a run.
//!
//! | Type | Role |
//! |------|------|
//! | `Job` | Unit of real-time work (WCET, release, deadline, period) |
//! | `Message` | Precedence edge with payload size |
//! | `Application` | Jobs + messages |
//! | `Node`, `Link`, `Platform` | Target hardware topology |
//! | `Schedule`, `ScheduleEntry` | Committed timeline and deadline misses |

mod job;
mod message;
mod platform;
mod schedule;

pub use job::{Job, JobId};
pub use message::{Application, Message};
pub use platform::{Link, Node, NodeId, NodeKind, Platform};
pub use schedule::{Schedule, ScheduleEntry};
