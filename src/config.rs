//! Configuration for a dispatch run.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::Node;

/// How cross-node message transfers affect readiness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayMode {
    /// Consumers on another node wait for `latency + size / bandwidth` per hop.
    #[default]
    WithDelay,
    /// Transfers are instantaneous; placement is still tracked.
    NoDelay,
}

/// Dispatcher configuration.
///
/// Every field has a default, so partial documents deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Communication delay model for multi-node runs.
    pub delay_mode: DelayMode,
    /// Re-evaluation step of time-dependent preemptive policies (least laxity).
    pub quantum: i64,
    /// Simulation epoch; no job starts earlier.
    pub start_time: i64,
    /// Processing node used by single-node runs.
    pub single_node: Node,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            delay_mode: DelayMode::WithDelay,
            quantum: 1,
            start_time: 0,
            single_node: Node::compute(0),
        }
    }
}

impl DispatchConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay mode.
    pub fn with_delay_mode(mut self, delay_mode: DelayMode) -> Self {
        self.delay_mode = delay_mode;
        self
    }

    /// Sets the preemption quantum.
    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = quantum;
        self
    }

    /// Sets the simulation epoch.
    pub fn with_start_time(mut self, start_time: i64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Sets the node used by single-node runs.
    pub fn with_single_node(mut self, node: Node) -> Self {
        self.single_node = node;
        self
    }

    /// Rejects configurations the dispatchers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.quantum < 1 {
            return Err(ScheduleError::InvalidInput(format!(
                "quantum must be at least 1, got {}",
                self.quantum
            )));
        }
        if self.start_time < 0 {
            return Err(ScheduleError::InvalidInput(format!(
                "start time must be non-negative, got {}",
                self.start_time
            )));
        }
        if !(self.single_node.speed > 0.0 && self.single_node.speed.is_finite()) {
            return Err(ScheduleError::InvalidInput(format!(
                "single node speed must be positive, got {}",
                self.single_node.speed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DispatchConfig::default();
        assert_eq!(cfg.delay_mode, DelayMode::WithDelay);
        assert_eq!(cfg.quantum, 1);
        assert_eq!(cfg.start_time, 0);
        assert_eq!(cfg.single_node.id, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let cfg = DispatchConfig::new()
            .with_delay_mode(DelayMode::NoDelay)
            .with_quantum(5)
            .with_start_time(100)
            .with_single_node(Node::compute(3).with_speed(2.0));
        assert_eq!(cfg.delay_mode, DelayMode::NoDelay);
        assert_eq!(cfg.quantum, 5);
        assert_eq!(cfg.start_time, 100);
        assert_eq!(cfg.single_node.id, 3);
    }

    #[test]
    fn test_invalid_config() {
        assert!(DispatchConfig::new().with_quantum(0).validate().is_err());
        assert!(DispatchConfig::new().with_start_time(-1).validate().is_err());
        assert!(DispatchConfig::new()
            .with_single_node(Node::compute(0).with_speed(0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let cfg: DispatchConfig = serde_json::from_str(r#"{"delay_mode": "no_delay"}"#).unwrap();
        assert_eq!(cfg.delay_mode, DelayMode::NoDelay);
        assert_eq!(cfg.quantum, 1);
    }
}
