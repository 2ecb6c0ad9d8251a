//! Static real-time scheduling for task graphs.
//!
//! Given an application (jobs with execution times, releases, deadlines and
//! periods, plus precedence messages) and optionally a platform (compute
//! nodes, routers and links), produces a deterministic [`Schedule`] under one
//! of four priority policies: EDF, LDF, RMS and LL.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Job`, `Message`, `Application`, `Node`,
//!   `Link`, `Platform`, `Schedule`, `ScheduleEntry`
//! - **`graph`**: Validated precedence DAG with cycle detection
//! - **`dispatching`**: Priority rules and the `Policy` enum
//! - **`scheduler`**: Readiness tracking, single-node and multi-node
//!   dispatchers, deadline monitoring, schedule assembly
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling
//!   references, platform sanity)
//! - **`config`**: Run configuration
//!
//! # Example
//!
//! ```
//! use rt_schedule::models::{Application, Job};
//!
//! let app = Application::independent(vec![
//!     Job::new(1, 10).with_deadline(15),
//!     Job::new(2, 20).with_deadline(100),
//!     Job::new(3, 30).with_deadline(50),
//! ]);
//! let schedule = rt_schedule::edf_single_node(&app).unwrap();
//! assert_eq!(schedule.name, "EDF Single-node");
//! assert_eq!(schedule.start_time(3), Some(10));
//! assert!(schedule.missed_deadlines.is_empty());
//! ```
//!
//! # References
//!
//! - Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//!   Hard-Real-Time Environment"
//! - Buttazzo (2011), "Hard Real-Time Computing Systems"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod graph;
pub mod models;
pub mod scheduler;
pub mod validation;

use tracing::instrument;

pub use config::{DelayMode, DispatchConfig};
pub use dispatching::Policy;
pub use error::{Result, ScheduleError};
use graph::TaskGraph;
use models::{Application, Platform, Schedule};
use scheduler::{MultiNodeDispatcher, SingleNodeDispatcher};

/// Schedules an application on one node under `policy`.
#[instrument(skip_all, fields(policy = %policy))]
pub fn schedule_single_node(
    app: &Application,
    policy: Policy,
    config: &DispatchConfig,
) -> Result<Schedule> {
    let graph = TaskGraph::from_application(app)?;
    SingleNodeDispatcher::new(&graph, policy, config).run()
}

/// Schedules an application on the compute nodes of a platform under `policy`.
#[instrument(skip_all, fields(policy = %policy, delay_mode = ?config.delay_mode))]
pub fn schedule_multinode(
    app: &Application,
    platform: &Platform,
    policy: Policy,
    config: &DispatchConfig,
) -> Result<Schedule> {
    let graph = TaskGraph::from_application(app)?;
    MultiNodeDispatcher::new(&graph, platform, policy, config).run()
}

fn single(app: &Application, policy: Policy) -> Result<Schedule> {
    schedule_single_node(app, policy, &DispatchConfig::default())
}

fn multi(
    app: &Application,
    platform: &Platform,
    policy: Policy,
    delay: DelayMode,
) -> Result<Schedule> {
    let config = DispatchConfig::default().with_delay_mode(delay);
    schedule_multinode(app, platform, policy, &config)
}

/// Earliest Deadline First on one node.
pub fn edf_single_node(app: &Application) -> Result<Schedule> {
    single(app, Policy::Edf)
}

/// Latest Deadline First on one node.
pub fn ldf_single_node(app: &Application) -> Result<Schedule> {
    single(app, Policy::Ldf)
}

/// Rate-Monotonic on one node.
pub fn rms_single_node(app: &Application) -> Result<Schedule> {
    single(app, Policy::Rms)
}

/// Least Laxity on one node.
pub fn ll_single_node(app: &Application) -> Result<Schedule> {
    single(app, Policy::Ll)
}

/// Earliest Deadline First across nodes, with communication delays.
pub fn edf_multinode(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Edf, DelayMode::WithDelay)
}

/// Latest Deadline First across nodes, with communication delays.
pub fn ldf_multinode(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Ldf, DelayMode::WithDelay)
}

/// Rate-Monotonic across nodes, with communication delays.
pub fn rms_multinode(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Rms, DelayMode::WithDelay)
}

/// Least Laxity across nodes, with communication delays.
pub fn ll_multinode(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Ll, DelayMode::WithDelay)
}

/// Earliest Deadline First across nodes, instantaneous transfers.
pub fn edf_multinode_no_delay(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Edf, DelayMode::NoDelay)
}

/// Latest Deadline First across nodes, instantaneous transfers.
pub fn ldf_multinode_no_delay(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Ldf, DelayMode::NoDelay)
}

/// Rate-Monotonic across nodes, instantaneous transfers.
pub fn rms_multinode_no_delay(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Rms, DelayMode::NoDelay)
}

/// Least Laxity across nodes, instantaneous transfers.
pub fn ll_multinode_no_delay(app: &Application, platform: &Platform) -> Result<Schedule> {
    multi(app, platform, Policy::Ll, DelayMode::NoDelay)
}
