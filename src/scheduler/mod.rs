//! Dispatchers and their per-run machinery.
//!
//! A run flows through
//! [`ReadinessTracker`] → ranking ([`crate::dispatching`]) → dispatcher →
//! [`DeadlineMonitor`] → [`ScheduleAssembler`]. All state is owned by one
//! dispatcher invocation; inputs are only borrowed.
//!
//! - [`SingleNodeDispatcher`]: one node; non-preemptive, LDF sequence, or
//!   preemptive time-stepped loop.
//! - [`MultiNodeDispatcher`]: list scheduling across compute nodes with
//!   per-hop communication delays ([`Router`]).
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems", Ch. 3-4

mod assembler;
mod ldf;
mod monitor;
mod multi;
mod readiness;
mod routing;
mod single;

pub use assembler::ScheduleAssembler;
pub use ldf::reverse_sequence;
pub use monitor::DeadlineMonitor;
pub use multi::{MultiNodeDispatcher, Ranking};
pub use readiness::{JobState, ReadinessTracker};
pub use routing::Router;
pub use single::SingleNodeDispatcher;
