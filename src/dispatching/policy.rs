//! The closed set of supported policies.

use serde::{Deserialize, Serialize};

use super::{rules, RuleEngine};
use crate::config::DelayMode;
use crate::error::{Result, ScheduleError};
use crate::graph::TaskGraph;
use crate::models::Job;

/// A priority policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Earliest Deadline First (non-preemptive).
    Edf,
    /// Latest Deadline First, reverse-topological construction (non-preemptive).
    Ldf,
    /// Rate-Monotonic (preemptive, static priority).
    Rms,
    /// Least Laxity (preemptive, dynamic priority).
    Ll,
}

impl Policy {
    /// All policies.
    pub const ALL: [Policy; 4] = [Policy::Edf, Policy::Ldf, Policy::Rms, Policy::Ll];

    /// Short name ("EDF", "LDF", "RMS", "LL").
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Edf => "EDF",
            Policy::Ldf => "LDF",
            Policy::Rms => "RMS",
            Policy::Ll => "LL",
        }
    }

    /// Ranking engine for this policy.
    pub fn engine(&self) -> RuleEngine {
        match self {
            Policy::Edf => RuleEngine::new(rules::Edf),
            Policy::Ldf => RuleEngine::new(rules::Ldf),
            Policy::Rms => RuleEngine::new(rules::Rms),
            Policy::Ll => RuleEngine::new(rules::LeastLaxity),
        }
    }

    /// Whether the policy preempts running jobs.
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Policy::Rms | Policy::Ll)
    }

    /// Label of a single-node schedule (e.g. "EDF Single-node").
    pub fn single_node_label(&self) -> String {
        format!("{} Single-node", self.name())
    }

    /// Label of a multi-node schedule (e.g. "EDF Multinode(without delay)").
    pub fn multinode_label(&self, delay_mode: DelayMode) -> String {
        match delay_mode {
            DelayMode::WithDelay => format!("{} Multinode", self.name()),
            DelayMode::NoDelay => format!("{} Multinode(without delay)", self.name()),
        }
    }

    /// Checks that a job carries the attributes this policy ranks by.
    ///
    /// RMS needs a period; EDF, LDF and LL need an explicit or period-derived deadline.
    pub fn check_job(&self, job: &Job) -> Result<()> {
        let missing = match self {
            Policy::Rms if job.period.is_none() => Some("missing period"),
            Policy::Rms => None,
            _ if job.absolute_deadline().is_none() => Some("missing deadline and period"),
            _ => None,
        };
        match missing {
            Some(reason) => Err(ScheduleError::InfeasiblePolicyInput {
                job: job.id,
                policy: self.name(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Checks every job of a graph.
    pub fn check_graph(&self, graph: &TaskGraph) -> Result<()> {
        graph.jobs().iter().try_for_each(|job| self.check_job(job))
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Policy::Edf.single_node_label(), "EDF Single-node");
        assert_eq!(Policy::Ldf.multinode_label(DelayMode::WithDelay), "LDF Multinode");
        assert_eq!(
            Policy::Ll.multinode_label(DelayMode::NoDelay),
            "LL Multinode(without delay)"
        );
    }

    #[test]
    fn test_preemption_flags() {
        for policy in Policy::ALL {
            assert_eq!(policy.is_preemptive(), policy.engine().is_preemptive());
            assert_eq!(policy.engine().rule_name(), policy.name());
        }
    }

    #[test]
    fn test_rms_requires_period() {
        let err = Policy::Rms
            .check_job(&Job::new(4, 10).with_deadline(20))
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InfeasiblePolicyInput { job: 4, policy: "RMS", .. }
        ));
        assert!(Policy::Rms.check_job(&Job::new(4, 10).with_period(20)).is_ok());
    }

    #[test]
    fn test_deadline_policies_accept_period() {
        let periodic = Job::new(1, 5).with_period(30);
        let bare = Job::new(2, 5);
        for policy in [Policy::Edf, Policy::Ldf, Policy::Ll] {
            assert!(policy.check_job(&periodic).is_ok());
            assert!(policy.check_job(&bare).is_err());
        }
    }

    #[test]
    fn test_serde_names() {
        let p: Policy = serde_json::from_str("\"rms\"").unwrap();
        assert_eq!(p, Policy::Rms);
        assert_eq!(Policy::Ll.to_string(), "LL");
    }
}
