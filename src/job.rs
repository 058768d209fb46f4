//! Job definition.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cadence::Cadence;

/// Callback signature for [`Action::Call`] jobs: receives the bound
/// parameter list, returns captured output or nothing.
pub type CallbackFn = dyn Fn(&[Value]) -> Option<String> + Send + Sync;

/// Guard predicate signature: receives the bound parameter list, returns
/// whether the job may run this tick.
pub type GuardFn = dyn Fn(&[Value]) -> bool + Send + Sync;

/// What a job executes. Exactly one variant per job.
#[derive(Clone)]
pub enum Action {
    /// Run a raw command line through the platform shell.
    Shell(String),
    /// Run a script file as a program.
    Script(PathBuf),
    /// Invoke a registered callback with its bound parameters.
    Call {
        /// The callback to invoke.
        func: Arc<CallbackFn>,
        /// Ordered parameters passed on every invocation.
        params: Vec<Value>,
    },
}

impl Action {
    /// Short variant name for logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Shell(_) => "shell",
            Action::Script(_) => "script",
            Action::Call { .. } => "callback",
        }
    }

    /// Human-readable one-line summary of the action target.
    pub fn summary(&self) -> String {
        match self {
            Action::Shell(cmd) => cmd.clone(),
            Action::Script(path) => path.display().to_string(),
            Action::Call { params, .. } => format!("callback({} params)", params.len()),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shell(cmd) => f.debug_tuple("Shell").field(cmd).finish(),
            Action::Script(path) => f.debug_tuple("Script").field(path).finish(),
            Action::Call { params, .. } => f
                .debug_struct("Call")
                .field("params", params)
                .finish_non_exhaustive(),
        }
    }
}

/// Per-job policy for due-but-already-running instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    /// Skip the run while the job's lock marker exists.
    #[default]
    SkipIfLocked,
    /// Run regardless; no lock is created or checked for this job.
    AlwaysRun,
}

/// Optional predicate gating execution after the due check.
#[derive(Clone)]
pub struct Guard {
    func: Arc<GuardFn>,
    params: Vec<Value>,
}

impl Guard {
    /// Bind a predicate and its ordered parameters.
    pub fn new<F>(func: F, params: Vec<Value>) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            params,
        }
    }

    /// Invoke the predicate with its bound parameters.
    pub fn check(&self) -> bool {
        (self.func)(&self.params)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// One scheduled unit of work.
#[derive(Debug, Clone)]
pub struct Job {
    /// Normalized unique label; primary key for lookups, lock naming, and
    /// report indexing.
    pub label: String,
    /// What the job executes.
    pub action: Action,
    /// When the job is due. Defaults to every minute.
    pub schedule: Cadence,
    /// Overlap policy.
    pub overlap: Overlap,
    /// Per-job output sink; overrides the engine-wide default when set.
    pub output: Option<PathBuf>,
    /// Optional execution guard.
    pub guard: Option<Guard>,
}

impl Job {
    /// Create a job with the default every-minute schedule.
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
            schedule: Cadence::every_minute(),
            overlap: Overlap::default(),
            output: None,
            guard: None,
        }
    }

    /// Resolved configuration snapshot for listings.
    pub fn info(&self) -> JobInfo {
        JobInfo {
            label: self.label.clone(),
            kind: self.action.kind(),
            action: self.action.summary(),
            schedule: self.schedule.clone(),
            overlap: self.overlap,
            output: self.output.clone(),
            guarded: self.guard.is_some(),
        }
    }
}

/// Serializable view of one registered job's resolved configuration.
#[derive(Debug, Clone, Serialize)]
pub struct JobInfo {
    /// Normalized label.
    pub label: String,
    /// Action variant name.
    pub kind: &'static str,
    /// Action target summary.
    pub action: String,
    /// Recurrence expression.
    pub schedule: Cadence,
    /// Overlap policy.
    pub overlap: Overlap,
    /// Per-job output sink, if any.
    pub output: Option<PathBuf>,
    /// Whether an execution guard is configured.
    pub guarded: bool,
}
