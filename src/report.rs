//! Tick reports.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one job execution within a tick.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// Normalized job label.
    pub label: String,
    /// When the action was dispatched.
    pub started_at: DateTime<Utc>,
    /// When the action (and output handling) completed.
    pub finished_at: DateTime<Utc>,
    /// Wall-clock execution time.
    pub elapsed: Duration,
    /// Captured output, absent when the action produced none.
    pub output: Option<String>,
}

/// Structured result of one [`Scheduler::tick`](crate::Scheduler::tick) call.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// When the tick started.
    pub started_at: DateTime<Utc>,
    /// When the tick finished.
    pub finished_at: DateTime<Utc>,
    /// Total tick duration.
    pub elapsed: Duration,
    /// Per-job outcomes in execution snapshot order.
    pub outcomes: Vec<JobOutcome>,
    /// Number of jobs in the execution snapshot.
    pub count: usize,
}

impl TickReport {
    /// Outcome for `label`, if the job was in the execution snapshot.
    pub fn outcome(&self, label: &str) -> Option<&JobOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }

    /// Whether `label` was executed this tick.
    pub fn executed(&self, label: &str) -> bool {
        self.outcome(label).is_some()
    }
}
