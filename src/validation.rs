//! Input validation for scheduling problems.
//!
//! Checks structural integrity of jobs, messages, and platforms before
//! scheduling. Detects:
//! - Duplicate IDs
//! - Non-positive execution times and periods, negative releases and payloads
//! - Messages referencing unknown jobs
//! - Links and affinities referencing unknown nodes
//! - Platforms without compute nodes or with non-positive speeds
//!
//! Cycle detection lives in the graph builder, which owns the DAG.

use std::collections::HashSet;

use crate::error::ScheduleError;
use crate::models::{Job, JobId, Message, NodeId, Platform};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A job has a non-positive WCET or period, or a negative release.
    InvalidJob,
    /// A message has a negative payload.
    InvalidMessage,
    /// A message references a job that doesn't exist.
    UnknownJobReference(JobId),
    /// A link or affinity references a node that doesn't exist.
    UnknownNodeReference(NodeId),
    /// A node has a non-positive speed or a link a negative latency/bandwidth.
    InvalidPlatform,
    /// The platform has no node able to execute jobs.
    NoComputeNode,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ScheduleError {
    fn from(err: ValidationError) -> Self {
        match err.kind {
            ValidationErrorKind::UnknownJobReference(job) => {
                ScheduleError::unknown_job(job, err.message)
            }
            _ => ScheduleError::InvalidInput(err.message),
        }
    }
}

/// Converts a failed validation into the first reported error.
pub(crate) fn first_error(result: ValidationResult) -> Result<(), ScheduleError> {
    match result {
        Ok(()) => Ok(()),
        Err(errors) => Err(errors
            .into_iter()
            .next()
            .map(ScheduleError::from)
            .unwrap_or_else(|| ScheduleError::InvalidInput("validation failed".into()))),
    }
}

/// Validates jobs and messages.
///
/// Checks:
/// 1. No duplicate job IDs
/// 2. WCET > 0, period > 0 when present, release >= 0
/// 3. Message payloads >= 0
/// 4. Every message producer and consumer is a known job
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(jobs: &[Job], messages: &[Message]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if job.wcet <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidJob,
                format!("Job {} has non-positive execution time {}", job.id, job.wcet),
            ));
        }
        if let Some(period) = job.period {
            if period <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidJob,
                    format!("Job {} has non-positive period {}", job.id, period),
                ));
            }
        }
        if job.release_time < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidJob,
                format!("Job {} has negative release time {}", job.id, job.release_time),
            ));
        }
    }

    for (idx, msg) in messages.iter().enumerate() {
        let label = msg.id.unwrap_or(idx as u64);
        if msg.size < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidMessage,
                format!("Message {label} has negative size {}", msg.size),
            ));
        }
        for endpoint in [msg.producer, msg.consumer] {
            if !job_ids.contains(&endpoint) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownJobReference(endpoint),
                    format!("message {label}"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a platform against the jobs that will run on it.
///
/// Checks:
/// 1. No duplicate node IDs
/// 2. At least one compute node
/// 3. Node speeds > 0; link latency and bandwidth non-negative / positive
/// 4. Link endpoints and job affinities reference known nodes
pub fn validate_platform(platform: &Platform, jobs: &[Job]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut node_ids = HashSet::new();
    for node in &platform.nodes {
        if !node_ids.insert(node.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate node ID: {}", node.id),
            ));
        }
        if !(node.speed > 0.0 && node.speed.is_finite()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPlatform,
                format!("Node {} has invalid speed {}", node.id, node.speed),
            ));
        }
    }

    if !platform.nodes.iter().any(|n| n.is_compute()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoComputeNode,
            "Platform has no compute node",
        ));
    }

    for link in &platform.links {
        for endpoint in [link.a, link.b] {
            if !node_ids.contains(&endpoint) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownNodeReference(endpoint),
                    format!("Link {}-{} references unknown node {endpoint}", link.a, link.b),
                ));
            }
        }
        if link.latency < 0 || link.bandwidth.is_some_and(|bw| bw <= 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPlatform,
                format!("Link {}-{} has invalid latency or bandwidth", link.a, link.b),
            ));
        }
    }

    for job in jobs {
        for &node in &job.node_affinity {
            if !node_ids.contains(&node) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownNodeReference(node),
                    format!("Job {} is pinned to unknown node {node}", job.id),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
