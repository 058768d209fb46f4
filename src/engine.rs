//! Scheduler engine.
//!
//! One [`Scheduler::tick`] call processes the whole registered job set
//! against a single reference time, in two strict phases: snapshot the due
//! set (acquiring locks as it goes), then execute the snapshot in order.
//! The engine is synchronous and single-threaded; the lock protocol exists
//! for overlap between *separate invocations* of the host program, not for
//! intra-tick concurrency.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SchedulerConfig;
use crate::error::{Result, SchedulerError};
use crate::exec;
use crate::job::{Action, Job, JobInfo, Overlap};
use crate::lock::LockStore;
use crate::registry::{JobBuilder, JobRegistry};
use crate::report::{JobOutcome, TickReport};

/// Tick-driven job scheduler.
///
/// The caller registers jobs through the typed registration operations,
/// then invokes [`tick`](Self::tick) once per external timer firing. The
/// registry lives for one process invocation only; nothing about job
/// definitions is persisted.
pub struct Scheduler {
    registry: JobRegistry,
    locks: LockStore,
    default_output: Option<PathBuf>,
}

impl Scheduler {
    /// Create a scheduler. Fails with [`SchedulerError::Filesystem`] when
    /// lock tracking is enabled and the lock directory is not writable.
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        Ok(Self {
            registry: JobRegistry::new(),
            locks: LockStore::new(config.lock_mode)?,
            default_output: config.default_output,
        })
    }

    // --- registration ------------------------------------------------------

    /// Register a shell-command job. Returns the builder handle bound to it.
    pub fn command(
        &mut self,
        label: &str,
        command: impl Into<String>,
    ) -> Result<JobBuilder<'_>> {
        let job = self.registry.register(label, Action::Shell(command.into()))?;
        Ok(JobBuilder::new(job))
    }

    /// Register a script-file job.
    pub fn script(&mut self, label: &str, path: impl Into<PathBuf>) -> Result<JobBuilder<'_>> {
        let job = self.registry.register(label, Action::Script(path.into()))?;
        Ok(JobBuilder::new(job))
    }

    /// Register a callback job with its ordered parameter list.
    pub fn call<F>(&mut self, label: &str, func: F, params: Vec<Value>) -> Result<JobBuilder<'_>>
    where
        F: Fn(&[Value]) -> Option<String> + Send + Sync + 'static,
    {
        let action = Action::Call {
            func: std::sync::Arc::new(func),
            params,
        };
        let job = self.registry.register(label, action)?;
        Ok(JobBuilder::new(job))
    }

    // --- queries -----------------------------------------------------------

    /// Look up one registered job.
    pub fn job(&self, label: &str) -> Result<&Job> {
        self.registry.get(label)
    }

    /// All registered jobs and their resolved configuration, in
    /// registration order.
    pub fn jobs(&self) -> Vec<JobInfo> {
        self.registry.iter().map(Job::info).collect()
    }

    /// Whether `label` is due at `at`, ignoring lock state and guards.
    pub fn is_due(&self, label: &str, at: DateTime<Utc>) -> Result<bool> {
        self.registry.get(label)?.schedule.is_due(at)
    }

    /// The job's most recent occurrence before now, rendered with a chrono
    /// format string.
    pub fn previous_run(&self, label: &str, format: &str) -> Result<Option<String>> {
        let job = self.registry.get(label)?;
        Ok(job
            .schedule
            .prev_before(Utc::now())?
            .map(|t| t.format(format).to_string()))
    }

    /// The job's next occurrence after now, rendered with a chrono format
    /// string.
    pub fn next_run(&self, label: &str, format: &str) -> Result<Option<String>> {
        let job = self.registry.get(label)?;
        Ok(job
            .schedule
            .next_after(Utc::now())?
            .map(|t| t.format(format).to_string()))
    }

    // --- tick --------------------------------------------------------------

    /// Execute one tick against `now`.
    ///
    /// A [`SchedulerError::Filesystem`] raised while acquiring or releasing
    /// a lock, or while appending output, aborts the remainder of the
    /// batch; locks already acquired for not-yet-executed jobs remain held.
    /// Action failures are not errors — whatever text an action returns is
    /// simply recorded.
    pub fn tick(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let started_at = Utc::now();
        let tick_timer = Instant::now();

        // Phase 1: snapshot the due set. Locks are acquired here, not
        // during execution, so due-window evaluation is atomic with
        // respect to the whole batch.
        let mut snapshot: Vec<&Job> = Vec::new();
        for job in self.registry.iter() {
            let tracked = self.locks.is_enabled() && job.overlap == Overlap::SkipIfLocked;
            if tracked && self.locks.exists(&job.label) {
                debug!("'{}' is still locked, skipping", job.label);
                continue;
            }
            if !job.schedule.is_due(now)? {
                continue;
            }
            if let Some(guard) = &job.guard {
                if !guard.check() {
                    debug!("'{}' guard rejected, skipping", job.label);
                    continue;
                }
            }
            if tracked {
                self.locks.acquire(&job.label)?;
            }
            snapshot.push(job);
        }

        // Phase 2: execute the snapshot in order.
        let mut outcomes = Vec::with_capacity(snapshot.len());
        for job in &snapshot {
            let job_started = Utc::now();
            let job_timer = Instant::now();

            let output = exec::run_action(&job.action);

            // Release before output handling: the lock covers the action,
            // not the bookkeeping after it.
            if self.locks.is_enabled() && job.overlap == Overlap::SkipIfLocked {
                self.locks.release(&job.label)?;
            }

            if let Some(text) = output.as_deref() {
                if let Some(sink) = job.output.as_deref().or(self.default_output.as_deref()) {
                    append_output(sink, text)?;
                }
            }

            let elapsed = job_timer.elapsed();
            info!("executed '{}' in {:?}", job.label, elapsed);
            outcomes.push(JobOutcome {
                label: job.label.clone(),
                started_at: job_started,
                finished_at: Utc::now(),
                elapsed,
                output,
            });
        }

        let report = TickReport {
            started_at,
            finished_at: Utc::now(),
            elapsed: tick_timer.elapsed(),
            count: snapshot.len(),
            outcomes,
        };
        info!(
            "tick finished: {} of {} jobs executed in {:?}",
            report.count,
            self.registry.len(),
            report.elapsed
        );
        Ok(report)
    }
}

/// Append captured output to a sink, creating parent directories as needed.
/// A trailing newline is added when the text lacks one.
fn append_output(sink: &Path, text: &str) -> Result<()> {
    if let Some(parent) = sink.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(sink)
        .map_err(|e| fs_error(sink, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| fs_error(sink, e))?;
    if !text.ends_with('\n') {
        file.write_all(b"\n").map_err(|e| fs_error(sink, e))?;
    }
    debug!("appended {} bytes to {:?}", text.len(), sink);
    Ok(())
}

fn fs_error(path: &Path, source: std::io::Error) -> SchedulerError {
    SchedulerError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
