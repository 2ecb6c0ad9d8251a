//! Inter-job messages and the application document.
//!
//! A message is a precedence edge: its consumer may not start before the
//! producer completes and, across nodes, before the payload has arrived.

use serde::{Deserialize, Serialize};

use super::{Job, JobId};

/// A dependency edge carrying a payload from producer to consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Optional message identifier (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Producing job.
    #[serde(alias = "sender")]
    pub producer: JobId,
    /// Consuming job.
    #[serde(alias = "receiver")]
    pub consumer: JobId,
    /// Payload size, used with link bandwidth to derive transfer delay.
    #[serde(default)]
    pub size: i64,
}

impl Message {
    /// Creates an edge `producer → consumer` with an empty payload.
    pub fn new(producer: JobId, consumer: JobId) -> Self {
        Self {
            id: None,
            producer,
            consumer,
            size: 0,
        }
    }

    /// Sets the payload size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Sets the message identifier.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

/// The job set plus its message declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Jobs to schedule.
    #[serde(alias = "jobs")]
    pub tasks: Vec<Job>,
    /// Precedence edges between jobs.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Application {
    /// Creates an application from jobs and messages.
    pub fn new(tasks: Vec<Job>, messages: Vec<Message>) -> Self {
        Self { tasks, messages }
    }

    /// An application without dependencies.
    pub fn independent(tasks: Vec<Job>) -> Self {
        Self::new(tasks, Vec::new())
    }
}
